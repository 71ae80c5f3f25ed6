//! Health check handler.

use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Backend name of the content store.
    pub store: &'static str,
    /// Whether the store settings are complete.
    pub configured: bool,
}

/// GET /health - liveness probe.
///
/// Makes no store call; an unconfigured store is reported, not treated as
/// unhealthy.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.backend_name(),
        configured: state.config.store.is_configured(),
    })
}
