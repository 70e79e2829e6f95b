//! Media metadata model
//!
//! Typed view of the info-dict printed by `yt-dlp -J`. Every field is
//! optional or defaulted so that a sparse or oddly-typed document from an
//! unusual site still deserializes. Stream variants and thumbnails are
//! written back out exactly as the extractor produced them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Codec value the extractor uses for "this track is absent"
pub const NO_CODEC: &str = "none";

/// Metadata for one media page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub uploader: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub uploader_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub channel: Option<String>,
    /// Duration in seconds
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub webpage_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub formats: Vec<StreamVariant>,
    /// Thumbnail objects, passed through untouched
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnails: Vec<Value>,
}

impl MediaInfo {
    /// Parse the JSON document printed by the extractor
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// One selectable encoded rendition of a media asset
///
/// The typed fields are what pairing reads. Serializing a variant writes
/// `source`, the extractor's object exactly as received, so the raw listing
/// keeps every key, `null` and oddly-typed value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(remote = "Self")]
pub struct StreamVariant {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub format_id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub ext: String,
    /// Container hint such as `mp4_dash` or `webm_dash`
    #[serde(default, deserialize_with = "lenient_string")]
    pub container: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vcodec: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub acodec: Option<String>,
    /// Audio bitrate in kbps
    #[serde(default, deserialize_with = "lenient_f64")]
    pub abr: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fps: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize_approx: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub format_note: Option<String>,
    #[serde(skip)]
    pub source: Value,
}

impl<'de> Deserialize<'de> for StreamVariant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = Value::deserialize(deserializer)?;
        // An entry that is not an object keeps its source and no typed fields.
        let mut variant = StreamVariant::deserialize(&source).unwrap_or_default();
        variant.source = source;
        Ok(variant)
    }
}

impl Serialize for StreamVariant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.source.serialize(serializer)
    }
}

impl StreamVariant {
    /// Whether the variant may carry a video track
    pub fn has_video(&self) -> bool {
        has_track(self.vcodec.as_deref())
    }

    /// Whether the variant may carry an audio track
    pub fn has_audio(&self) -> bool {
        has_track(self.acodec.as_deref())
    }

    pub fn is_video_only(&self) -> bool {
        self.has_video() && !self.has_audio()
    }

    pub fn is_audio_only(&self) -> bool {
        self.has_audio() && !self.has_video()
    }

    /// Audio bitrate, with a missing value counted as zero
    pub fn abr_or_zero(&self) -> f64 {
        self.abr.unwrap_or(0.0)
    }

    /// Best-effort size in bytes: the approximation, else the exact size, else zero
    pub fn approx_size(&self) -> u64 {
        self.filesize_approx.or(self.filesize).unwrap_or(0)
    }
}

/// Only the literal `"none"` marks a track as absent; a missing codec says
/// nothing, so such a variant is never treated as single-track.
fn has_track(codec: Option<&str>) -> bool {
    codec != Some(NO_CODEC)
}

// Field deserializers: anything of the wrong JSON type becomes `None`.

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(d)?.as_f64())
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f.round() as u64)
    }))
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(lenient_u64(d)?.and_then(|v| u32::try_from(v).ok()))
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn variant(value: Value) -> StreamVariant {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_track_classification() {
        let video = variant(json!({"format_id": "137", "vcodec": "avc1.640028", "acodec": "none"}));
        assert!(video.is_video_only());
        assert!(!video.is_audio_only());

        let audio = variant(json!({"format_id": "140", "vcodec": "none", "acodec": "mp4a.40.2"}));
        assert!(audio.is_audio_only());

        let muxed = variant(json!({"format_id": "18", "vcodec": "avc1", "acodec": "mp4a"}));
        assert!(muxed.has_video() && muxed.has_audio());
        assert!(!muxed.is_video_only() && !muxed.is_audio_only());
    }

    #[test]
    fn test_only_literal_none_marks_a_missing_track() {
        // HLS renditions often omit `acodec` even though they carry audio.
        let hls = variant(json!({"format_id": "hls-720", "vcodec": "avc1.4d401f"}));
        assert!(!hls.is_video_only());
        assert!(!hls.is_audio_only());

        let audio = variant(json!({"format_id": "hls-audio", "vcodec": "none"}));
        assert!(audio.is_audio_only());

        let bare = variant(json!({"format_id": "sb0"}));
        assert!(bare.has_video() && bare.has_audio());
        assert!(!bare.is_video_only() && !bare.is_audio_only());
    }

    #[test]
    fn test_wrong_types_degrade_to_none() {
        let v = variant(json!({
            "format_id": 251,
            "abr": "high",
            "height": null,
            "width": 1920.0,
            "filesize_approx": 1234.6,
            "vcodec": 5
        }));
        assert_eq!(v.format_id, "251");
        assert_eq!(v.abr, None);
        assert_eq!(v.abr_or_zero(), 0.0);
        assert_eq!(v.height, None);
        assert_eq!(v.width, Some(1920));
        assert_eq!(v.filesize_approx, Some(1235));
        assert_eq!(v.vcodec, None);
    }

    #[test]
    fn test_approx_size_fallbacks() {
        let both = variant(json!({"filesize": 10, "filesize_approx": 12}));
        assert_eq!(both.approx_size(), 12);
        let exact = variant(json!({"filesize": 10}));
        assert_eq!(exact.approx_size(), 10);
        let neither = variant(json!({}));
        assert_eq!(neither.approx_size(), 0);
    }

    #[test]
    fn test_serializes_source_verbatim() {
        let source = json!({
            "format_id": 251,
            "height": null,
            "abr": "high",
            "filesize_approx": 1234.6,
            "dynamic_range": "SDR",
            "asr": 44100
        });
        let v = variant(source.clone());
        assert_eq!(v.format_id, "251");
        assert_eq!(serde_json::to_value(&v).unwrap(), source);
    }

    #[test]
    fn test_non_object_entry_is_kept() {
        let v = variant(json!("mystery"));
        assert_eq!(v.format_id, "");
        assert!(!v.is_video_only() && !v.is_audio_only());
        assert_eq!(serde_json::to_value(&v).unwrap(), json!("mystery"));
    }

    #[test]
    fn test_media_info_from_json() {
        let doc = json!({
            "id": "abc123",
            "title": "A video",
            "uploader": "someone",
            "duration": 212,
            "view_count": 1000,
            "webpage_url": "https://example.com/watch?v=abc123",
            "formats": [{"format_id": "18", "ext": "mp4"}],
            "thumbnails": [{"url": "https://i.example.com/1.jpg", "id": 0}],
            "is_live": false
        });
        let info = MediaInfo::from_json(doc.to_string().as_bytes()).unwrap();
        assert_eq!(info.id.as_deref(), Some("abc123"));
        assert_eq!(info.duration, Some(212.0));
        assert_eq!(info.view_count, Some(1000));
        assert_eq!(info.channel, None);
        assert_eq!(info.formats.len(), 1);
        assert_eq!(info.thumbnails[0], json!({"url": "https://i.example.com/1.jpg", "id": 0}));
    }

    #[test]
    fn test_media_info_null_lists() {
        let info = MediaInfo::from_json(br#"{"id": "x", "formats": null}"#).unwrap();
        assert!(info.formats.is_empty());
        assert!(info.thumbnails.is_empty());
    }

    #[test]
    fn test_media_info_rejects_non_object() {
        assert!(MediaInfo::from_json(b"42").is_err());
        assert!(MediaInfo::from_json(b"not json").is_err());
    }
}
