//! Error types for core parsing and validation

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating local input before it reaches the service
#[derive(Debug, Error)]
pub enum Error {
    /// Pipeline state outside ENABLED, DISABLED, RELEASED
    #[error("invalid state '{0}', must be ENABLED, DISABLED or RELEASED")]
    InvalidState(String),

    /// YAML parsed but is not a usable pipeline definition
    #[error("invalid pipeline document: {0}")]
    InvalidDocument(String),

    /// YAML could not be parsed at all
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
