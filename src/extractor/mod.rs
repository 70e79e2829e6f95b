//! Media metadata extraction
//!
//! The [`MediaExtractor`] trait is the seam between the HTTP layer and the
//! third-party extractor. [`YtDlpExtractor`] is the production
//! implementation; tests substitute their own.

pub mod cookies;
pub mod process;
pub mod ytdlp;

use async_trait::async_trait;

use crate::error::ExtractError;
use crate::media::MediaInfo;

pub use ytdlp::YtDlpExtractor;

/// Source of media metadata for a page URL
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Short identifier for logs and `/health`
    fn name(&self) -> &'static str;

    /// Extract metadata for `url` without downloading any media
    async fn extract(&self, url: &str) -> Result<MediaInfo, ExtractError>;

    /// Version of the underlying tool, if it can be determined
    async fn version(&self) -> Option<String> {
        None
    }
}
