//! Content store error types.

use thiserror::Error;

/// Content store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("blob not found: {path} ({reason})")]
    NotFound { path: String, reason: String },

    #[error("blob already exists: {0}")]
    AlreadyExists(String),

    /// The write was rejected because the expected `sha` is stale or missing.
    #[error("write conflict ({status}): {reason}")]
    Conflict { status: u16, reason: String },

    #[error("store rejected request ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Short reason suitable for caller-facing messages.
    ///
    /// For HTTP failures this is the store's own message when it sent one,
    /// otherwise the status text.
    pub fn reason(&self) -> String {
        match self {
            Self::NotFound { reason, .. }
            | Self::Conflict { reason, .. }
            | Self::Rejected { reason, .. } => reason.clone(),
            Self::AlreadyExists(_) => "File already exists".to_string(),
            Self::Transport(e) => e.to_string(),
            Self::Decode(msg) | Self::Config(msg) => msg.clone(),
        }
    }

    /// HTTP status reported by the store, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Conflict { status, .. } | Self::Rejected { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::AlreadyExists(_) | Self::Decode(_) | Self::Config(_) => None,
        }
    }

    /// Whether the blob does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for content store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
