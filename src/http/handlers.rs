//! HTTP request handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::FormatsMode;
use crate::error::ExtractError;
use crate::media::{MediaInfo, StreamVariant};
use crate::pairing::{pair, MergedVariant};
use crate::state::AppState;

pub const MISSING_URL_MESSAGE: &str = "Missing 'url' parameter. Use /api?url=VIDEO_URL";

/// Advisory attached to every extraction failure
pub const FAILURE_NOTE: &str = "Some platforms like TikTok or Drive may block or rate-limit. \
     Try using a proxy or check if login is required.";

/// HTTP error type
#[derive(Debug)]
pub enum HttpError {
    MissingParameter(String),
    BadRequest(String),
    Extraction(ExtractError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'static str>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message, note) = match self {
            HttpError::MissingParameter(msg) | HttpError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg, None)
            }
            HttpError::Extraction(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
                Some(FAILURE_NOTE),
            ),
        };

        let body = ErrorBody {
            status: "error",
            message,
            note,
        };
        (status, Json(body)).into_response()
    }
}

impl From<ExtractError> for HttpError {
    fn from(err: ExtractError) -> Self {
        HttpError::Extraction(err)
    }
}

/// Query parameters for `/api`
#[derive(Debug, Deserialize)]
pub struct ApiQuery {
    pub url: Option<String>,
    /// Overrides the configured formats mode
    pub formats: Option<String>,
}

/// The `formats` list, merged or as reported by the extractor
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Formats {
    Merged(Vec<MergedVariant>),
    Raw(Vec<StreamVariant>),
}

impl Formats {
    pub fn count(&self) -> usize {
        match self {
            Formats::Merged(v) => v.len(),
            Formats::Raw(v) => v.len(),
        }
    }
}

/// Successful `/api` response body
#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub id: Option<String>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub uploader_id: Option<String>,
    pub channel: Option<String>,
    pub duration: Option<f64>,
    pub view_count: Option<u64>,
    pub webpage_url: Option<String>,
    pub formats: Formats,
    pub thumbnails: Vec<serde_json::Value>,
}

impl MediaResponse {
    pub fn build(info: MediaInfo, mode: FormatsMode) -> Self {
        let formats = match mode {
            FormatsMode::Merged => Formats::Merged(pair(&info.formats)),
            FormatsMode::Raw => Formats::Raw(info.formats),
        };

        Self {
            id: info.id,
            title: info.title,
            uploader: info.uploader,
            uploader_id: info.uploader_id,
            channel: info.channel,
            duration: info.duration,
            view_count: info.view_count,
            webpage_url: info.webpage_url,
            formats,
            thumbnails: info.thumbnails,
        }
    }
}

/// Usage document
/// GET /
pub async fn home(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Media metadata API",
        "usage": "/api?url=https://example.com/video",
        "powered_by": state.extractor.name(),
        "version": env!("CARGO_PKG_VERSION"),
        "formats": {
            "default": state.config.formats.to_string(),
            "choices": ["merged", "raw"],
        },
        "endpoints": {
            "/api?url=URL[&formats=merged|raw]": "Extract metadata and stream formats for URL",
            "/health": "Extractor availability",
            "/version": "Server version",
        },
    }))
}

/// Health endpoint
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let version = state.extractor.version().await;
    Json(serde_json::json!({
        "status": if version.is_some() { "ok" } else { "degraded" },
        "extractor": state.extractor.name(),
        "version": version,
    }))
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("media-info-server v", env!("CARGO_PKG_VERSION"))
}

/// Metadata endpoint
/// GET /api?url=...
pub async fn media_info(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<MediaResponse>, HttpError> {
    let url = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| HttpError::MissingParameter(MISSING_URL_MESSAGE.to_string()))?;

    let mode = match query.formats.as_deref() {
        Some(m) => m.parse::<FormatsMode>().map_err(HttpError::BadRequest)?,
        None => state.config.formats,
    };

    let span = tracing::info_span!("extract", request_id = %Uuid::new_v4(), %url);
    async move {
        let info = state.extractor.extract(url).await?;
        let response = MediaResponse::build(info, mode);
        tracing::info!(mode = %mode, formats = response.formats.count(), "Metadata ready");
        Ok::<_, HttpError>(Json(response))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_info() -> MediaInfo {
        serde_json::from_value(json!({
            "id": "abc",
            "title": "Sample",
            "uploader": "Uploader",
            "uploader_id": "@uploader",
            "channel": "Channel",
            "duration": 61.5,
            "view_count": 42,
            "webpage_url": "https://example.com/watch?v=abc",
            "formats": [
                {"format_id": "v1", "ext": "mp4", "vcodec": "vp9", "acodec": "none"},
                {"format_id": "a1", "ext": "webm", "vcodec": "none", "acodec": "opus", "abr": 128},
                {"format_id": "a2", "ext": "webm", "vcodec": "none", "acodec": "opus", "abr": 64}
            ],
            "thumbnails": [{"url": "https://i.example.com/abc.jpg"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_merged_response() {
        let body = serde_json::to_value(MediaResponse::build(sample_info(), FormatsMode::Merged)).unwrap();
        assert_eq!(body["id"], "abc");
        assert_eq!(body["duration"], 61.5);
        assert_eq!(body["formats"].as_array().unwrap().len(), 1);
        assert_eq!(body["formats"][0]["format_id"], "v1+a1");
        assert_eq!(body["thumbnails"][0]["url"], "https://i.example.com/abc.jpg");
    }

    #[test]
    fn test_raw_response() {
        let body = serde_json::to_value(MediaResponse::build(sample_info(), FormatsMode::Raw)).unwrap();
        let formats = body["formats"].as_array().unwrap();
        assert_eq!(formats.len(), 3);
        assert_eq!(formats[1]["format_id"], "a1");
        assert_eq!(formats[1]["abr"], 128);
    }

    #[test]
    fn test_raw_response_keeps_extractor_values() {
        let source = json!({"format_id": "x", "height": null, "abr": "high", "filesize": 12.5});
        let mut info = sample_info();
        info.formats = vec![serde_json::from_value(source.clone()).unwrap()];

        let body = serde_json::to_value(MediaResponse::build(info, FormatsMode::Raw)).unwrap();
        assert_eq!(body["formats"], json!([source]));
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let body = serde_json::to_value(MediaResponse::build(MediaInfo::default(), FormatsMode::Merged)).unwrap();
        assert!(body["title"].is_null());
        assert_eq!(body["formats"], json!([]));
        assert_eq!(body["thumbnails"], json!([]));
    }

    #[tokio::test]
    async fn test_error_bodies() {
        let response = HttpError::MissingParameter(MISSING_URL_MESSAGE.to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert!(body.get("note").is_none());

        let response = HttpError::from(ExtractError::Timeout(60)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Extraction timed out after 60s");
        assert_eq!(body["note"], FAILURE_NOTE);
    }
}
