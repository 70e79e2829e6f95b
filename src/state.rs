//! Application state shared across handlers

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::extractor::{MediaExtractor, YtDlpExtractor};

/// Immutable per-process state; everything request-specific lives in the handler.
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    /// Metadata extractor
    pub extractor: Arc<dyn MediaExtractor>,
}

impl AppState {
    /// Create state with the yt-dlp extractor described by `config`
    pub fn new(config: ServerConfig) -> Self {
        let extractor = Arc::new(YtDlpExtractor::new(config.extractor.clone()));
        tracing::info!("Using yt-dlp at {}", extractor.program().display());
        Self::with_extractor(config, extractor)
    }

    /// Create state around an existing extractor
    pub fn with_extractor(config: ServerConfig, extractor: Arc<dyn MediaExtractor>) -> Self {
        Self { config, extractor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new(ServerConfig::default());
        assert_eq!(state.extractor.name(), "yt-dlp");
        assert_eq!(state.config.port, 3000);
    }
}
