//! Application state shared across handlers.

use folio_core::config::AppConfig;
use folio_store::ContentStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Content store backend.
    pub store: Arc<dyn ContentStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// An incomplete store configuration is not fatal: the endpoint reports it
    /// per request. It is logged here so operators see it at startup.
    pub fn new(config: AppConfig, store: Arc<dyn ContentStore>) -> Self {
        let missing = config.store.missing_settings();
        if !missing.is_empty() {
            tracing::warn!(
                missing = %missing.join(", "),
                "Content store is not configured; content requests will fail"
            );
        }

        Self {
            config: Arc::new(config),
            store,
        }
    }
}
