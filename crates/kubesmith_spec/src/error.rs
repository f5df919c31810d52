//! Error types for deployment specs.

use thiserror::Error;

/// Result type alias for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors that can occur while validating a deployment request.
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid app name '{0}': must be a lowercase DNS label ([a-z0-9] with interior hyphens)")]
    InvalidAppName(String),

    #[error("Unknown value '{value}' for field {field}")]
    UnknownValue { field: String, value: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
