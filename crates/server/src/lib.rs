//! HTTP content endpoint for Folio.
//!
//! This crate provides:
//! - The content endpoint: read, create, update and delete JSON documents
//!   held in a content store
//! - Error mapping onto HTTP status codes
//! - Health and Prometheus metrics endpoints

pub mod cors;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorKind};
pub use routes::create_router;
pub use state::AppState;
