//! Folio content server binary.

use anyhow::{Context, Result};
use clap::Parser;
use folio_core::config::AppConfig;
use folio_server::{AppState, create_router};
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Folio - content endpoint for a Git-backed site
#[derive(Parser, Debug)]
#[command(name = "folio-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "FOLIO_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Folio v{}", env!("CARGO_PKG_VERSION"));

    // The file is optional; GITHUB_* and FOLIO_* variables can provide everything.
    let config_path = Path::new(&args.config);
    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }
    let config = AppConfig::load(Some(config_path)).context("failed to load configuration")?;
    tracing::debug!(store = ?config.store, "Store configuration");

    if config.server.metrics_enabled {
        folio_server::metrics::register_metrics();
        tracing::info!("Prometheus metrics registered");
    }

    let store = folio_store::from_config(&config.store).context("failed to initialize content store")?;
    tracing::info!(
        backend = store.backend_name(),
        branch = %config.store.branch,
        content_root = %config.store.content_root,
        "Content store initialized"
    );

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    let state = AppState::new(config, store);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
