//! Error types for manifest generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation operations.
pub type GenResult<T> = Result<T, GenError>;

/// Errors that can occur during manifest generation. All of these are
/// fatal; generation never continues past the first failure.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Template not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
