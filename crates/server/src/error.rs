//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::config::StatusCodeMode;
use folio_store::StoreError;
use serde::Serialize;

/// Hint returned with configuration errors.
pub const CONFIG_HINT: &str =
    "Check the store configuration (GITHUB_* environment variables or the [store] table).";

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Closed set of failure kinds surfaced by the content endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Unconfigured,
    InvalidInput,
    NotFound,
    Conflict,
    UpstreamFailure,
}

impl ErrorKind {
    /// Classify a store failure.
    pub fn of_store(err: &StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound,
            StoreError::AlreadyExists(_) | StoreError::Conflict { .. } => Self::Conflict,
            StoreError::Rejected { .. }
            | StoreError::Transport(_)
            | StoreError::Decode(_)
            | StoreError::Config(_) => Self::UpstreamFailure,
        }
    }

    /// HTTP status for this kind under the configured mapping.
    pub fn status_code(self, mode: StatusCodeMode) -> StatusCode {
        match mode {
            StatusCodeMode::Legacy => StatusCode::INTERNAL_SERVER_ERROR,
            StatusCodeMode::Semantic => match self {
                Self::Unconfigured => StatusCode::INTERNAL_SERVER_ERROR,
                Self::InvalidInput => StatusCode::BAD_REQUEST,
                Self::NotFound => StatusCode::NOT_FOUND,
                Self::Conflict => StatusCode::CONFLICT,
                Self::UpstreamFailure => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Server configuration error")]
    Unconfigured { missing: Vec<&'static str> },

    #[error("{0}")]
    InvalidInput(String),

    /// A store call failed; `message` is the caller-facing text.
    #[error("{message}")]
    Store { kind: ErrorKind, message: String },

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    /// Wrap a store failure with a caller-facing message.
    pub fn store(err: &StoreError, message: impl Into<String>) -> Self {
        Self::Store {
            kind: ErrorKind::of_store(err),
            message: message.into(),
        }
    }

    /// Error kind, or `None` for the fixed routing response.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Unconfigured { .. } => Some(ErrorKind::Unconfigured),
            Self::InvalidInput(_) => Some(ErrorKind::InvalidInput),
            Self::Store { kind, .. } => Some(*kind),
            Self::MethodNotAllowed => None,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self, mode: StatusCodeMode) -> StatusCode {
        match self.kind() {
            Some(kind) => kind.status_code(mode),
            None => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Response body for this error.
    pub fn body(&self) -> ErrorResponse {
        match self {
            Self::Unconfigured { missing } => ErrorResponse {
                error: self.to_string(),
                details: Some(format!(
                    "Missing environment variables: {}",
                    missing.join(", ")
                )),
                hint: Some(CONFIG_HINT.to_string()),
            },
            _ => ErrorResponse {
                error: self.to_string(),
                details: None,
                hint: None,
            },
        }
    }

    /// Render the error under the given status code mapping.
    pub fn into_response_with(self, mode: StatusCodeMode) -> Response {
        (self.status_code(mode), Json(self.body())).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with(StatusCodeMode::default())
    }
}

impl From<folio_core::Error> for ApiError {
    fn from(err: folio_core::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
