//! Error types for policy validation.

use thiserror::Error;

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors that can occur during manifest validation.
///
/// Per-document problems are never errors here; they are recorded as
/// violations in the report. Only the aggregate verdict and fatal I/O
/// surface as `PolicyError`.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Manifest validation failed with {count} error(s):\n{details}")]
    ValidationFailed { count: usize, details: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
