//! Prometheus metrics for the Folio server.
//!
//! The `/metrics` endpoint is unauthenticated to allow scraping. Metrics carry
//! no document content, only method, status and store operation labels.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{LazyLock, Once};
use std::time::Instant;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static CONTENT_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "folio_content_requests_total",
            "Content endpoint requests by method and response status",
        ),
        &["method", "status"],
    )
    .expect("metric creation failed")
});

pub static STORE_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "folio_store_request_duration_seconds",
            "Time spent in content store calls",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["operation"],
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(CONTENT_REQUESTS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(STORE_REQUEST_DURATION.clone()))
            .expect("metric registration failed");
    });
}

/// Record one content endpoint response.
pub fn record_request(method: &str, status: StatusCode) {
    CONTENT_REQUESTS
        .with_label_values(&[method, status.as_str()])
        .inc();
}

/// Times one store call; the observation is recorded on drop.
pub struct StoreTimer {
    operation: &'static str,
    started: Instant,
}

impl StoreTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            started: Instant::now(),
        }
    }
}

impl Drop for StoreTimer {
    fn drop(&mut self) {
        STORE_REQUEST_DURATION
            .with_label_values(&[self.operation])
            .observe(self.started.elapsed().as_secs_f64());
    }
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_idempotent() {
        register_metrics();
        register_metrics();
    }

    #[test]
    fn store_timer_observes_on_drop() {
        let before = STORE_REQUEST_DURATION
            .with_label_values(&["timer_test"])
            .get_sample_count();
        drop(StoreTimer::start("timer_test"));
        let after = STORE_REQUEST_DURATION
            .with_label_values(&["timer_test"])
            .get_sample_count();
        assert_eq!(after, before + 1);
    }
}
