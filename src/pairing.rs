//! Stream variant pairing
//!
//! Sites that serve adaptive streams publish video and audio as separate
//! variants. This module turns them into playable combinations: every
//! video-only variant is paired with one representative audio-only variant,
//! the one with the highest audio bitrate.
//!
//! Variants that already carry both tracks are not part of the merged
//! output; they remain available through the raw format listing.

use serde::Serialize;

use crate::media::StreamVariant;

/// One video-only variant combined with the representative audio variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedVariant {
    /// `"{video_id}+{audio_id}"`
    pub format_id: String,
    pub ext: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcodec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acodec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abr: Option<f64>,
    /// Video stream URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    pub audio_ext: String,
    /// Sum of both components' size approximations
    pub filesize_approx: u64,
    pub format_note: String,
}

impl MergedVariant {
    fn new(video: &StreamVariant, audio: &StreamVariant) -> Self {
        Self {
            format_id: format!("{}+{}", video.format_id, audio.format_id),
            ext: video.ext.clone(),
            container: video.container.clone(),
            width: video.width,
            height: video.height,
            fps: video.fps,
            vcodec: video.vcodec.clone(),
            acodec: audio.acodec.clone(),
            abr: audio.abr,
            url: video.url.clone(),
            audio_url: audio.url.clone(),
            audio_ext: audio.ext.clone(),
            filesize_approx: video.approx_size().saturating_add(audio.approx_size()),
            format_note: describe(video, audio),
        }
    }
}

/// Pair every video-only variant with the best audio-only variant.
///
/// Returns an empty list when there is no audio-only variant. Output order
/// follows the input order of the video variants.
pub fn pair(variants: &[StreamVariant]) -> Vec<MergedVariant> {
    let Some(audio) = best_audio(variants) else {
        return Vec::new();
    };

    variants
        .iter()
        .filter(|v| v.is_video_only())
        .map(|video| MergedVariant::new(video, audio))
        .collect()
}

/// Audio-only variant with the highest `abr`, missing bitrate counting as
/// zero. The first one in input order wins a tie.
pub fn best_audio(variants: &[StreamVariant]) -> Option<&StreamVariant> {
    variants
        .iter()
        .filter(|v| v.is_audio_only())
        .reduce(|best, candidate| {
            if candidate.abr_or_zero() > best.abr_or_zero() {
                candidate
            } else {
                best
            }
        })
}

/// Human-readable label, e.g. `1080p60 avc1.640028 + 129kbps opus`
fn describe(video: &StreamVariant, audio: &StreamVariant) -> String {
    let mut picture = match video.height {
        Some(h) => format!("{}p", h),
        None => video
            .format_note
            .clone()
            .unwrap_or_else(|| "video".to_string()),
    };
    if let (Some(_), Some(fps)) = (video.height, video.fps) {
        if fps > 30.0 {
            picture.push_str(&format!("{}", fps.round() as u32));
        }
    }
    if let Some(vcodec) = &video.vcodec {
        picture.push(' ');
        picture.push_str(vcodec);
    }

    let acodec = audio.acodec.as_deref().unwrap_or("audio");
    let sound = match audio.abr {
        Some(abr) if abr > 0.0 => format!("{:.0}kbps {}", abr, acodec),
        _ => acodec.to_string(),
    };

    format!("{} + {}", picture, sound)
}
