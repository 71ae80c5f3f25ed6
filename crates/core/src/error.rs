//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Filename is required")]
    MissingFilename,

    #[error("invalid document name: {0}")]
    InvalidName(String),

    #[error("Invalid {name} document: {reason}")]
    InvalidDocument { name: String, reason: String },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
