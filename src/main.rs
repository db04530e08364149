//! Scrapbook - Entry Point
//!
//! Wiring sequence:
//! 1. Load config.toml (path from SCRAPBOOK_CONFIG) + env overrides
//! 2. Init tracing (JSON structured logging)
//! 3. Select and build the storage adapter (local disk or blob store)
//! 4. Build the session gate, metrics registry and shared state
//! 5. Serve the API, health and metrics routes
//! 6. Wait for SIGINT → mark not-ready → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use scrapbook::adapters::convert;
use scrapbook::adapters::http::{self, AppState, SessionGate};
use scrapbook::adapters::metrics::MetricsRegistry;
use scrapbook::adapters::storage::build_adapter;
use scrapbook::config;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path =
        std::env::var("SCRAPBOOK_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.server.log_level)
                }),
        )
        .json()
        .init();

    config::loader::log_loaded(&config, &config_path);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.server.bind_address,
        "Starting scrapbook"
    );

    // ── 3. Storage adapter (selected once) ──────────────────
    let storage = build_adapter(&config.storage).context("Failed to build storage adapter")?;

    // ── 4. Shared state ─────────────────────────────────────
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
    let state = AppState::new(
        storage,
        convert::default_converter(),
        SessionGate::from_config(&config.auth),
        metrics,
        &config.storage.local,
    );
    let health = state.health.clone();
    let app = http::router(state, config.server.max_upload_bytes);

    // ── 5. Serve ────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;

    let server_handle = tokio::spawn(async move {
        if let Err(e) = http::serve(listener, app, shutdown_rx).await {
            error!(error = %e, "HTTP server failed");
        }
    });

    // ── 6. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c().await.context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    health.begin_shutdown();
    let _ = shutdown_tx.send(());

    let _ = tokio::time::timeout(std::time::Duration::from_secs(10), server_handle).await;

    info!("Shutdown complete");
    Ok(())
}
