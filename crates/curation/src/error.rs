use thiserror::Error;

/// Result type for curation operations
pub type Result<T> = std::result::Result<T, CurationError>;

/// Errors that can occur during scoring and template rotation
#[derive(Error, Debug)]
pub enum CurationError {
    /// No templates available for a domain
    #[error("No templates loaded for domain: {0}")]
    EmptyCatalog(String),

    /// Invalid task profile
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Template catalog failed to parse
    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),
}

impl CurationError {
    /// Create an invalid profile error
    pub fn invalid_profile(msg: impl Into<String>) -> Self {
        Self::InvalidProfile(msg.into())
    }
}
