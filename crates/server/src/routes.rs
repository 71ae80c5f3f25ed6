//! Route configuration.

use crate::cors::cors_middleware;
use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{any, get};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let base = state.config.server.normalized_base_path();
    let collection = if base.is_empty() { "/" } else { base.as_str() };

    // Every method is routed to the handlers, which own the 405 response.
    // Names may nest (`blog/post`), so the document route is a wildcard.
    let content_routes = Router::new()
        .route(collection, any(handlers::content_collection))
        .route(
            &format!("{base}/{{*filename}}"),
            any(handlers::content_document),
        )
        .layer(middleware::from_fn(cors_middleware));

    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .merge(content_routes);

    // When enabled, restrict /metrics to scraper networks at the proxy.
    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
