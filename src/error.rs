use thiserror::Error;

/// Main error type for server startup
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extractor-specific errors
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Extractor not found: {0}")]
    ToolNotFound(String),

    #[error("Failed to start extractor: {0}")]
    Spawn(std::io::Error),

    #[error("Extraction timed out after {0}s")]
    Timeout(u64),

    /// Message reported by the extractor itself
    #[error("{0}")]
    Failed(String),

    #[error("Invalid extractor output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to prepare cookie file: {0}")]
    Credentials(std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ServerError>;
