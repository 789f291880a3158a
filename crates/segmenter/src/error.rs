use thiserror::Error;

/// Result type for segmenter operations
pub type Result<T> = std::result::Result<T, SegmenterError>;

/// Errors that can occur during segment extraction
#[derive(Error, Debug)]
pub enum SegmenterError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Empty content
    #[error("Empty content provided")]
    EmptyContent,

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SegmenterError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
