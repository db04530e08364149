//! Health Check Routes - Liveness and Readiness Probes
//!
//! Exposes /live and /ready. Readiness follows the storage
//! adapter's own health probe and flips to 503 once shutdown begins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::ports::storage::StorageAdapter;

/// Shared health state polled by readiness probes.
#[derive(Clone)]
pub struct HealthState {
    /// Backend whose health gates readiness.
    storage: Arc<dyn StorageAdapter>,
    /// Cleared when graceful shutdown starts.
    accepting: Arc<AtomicBool>,
}

impl HealthState {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            accepting: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the service as draining; readiness turns 503.
    pub fn begin_shutdown(&self) {
        self.accepting.store(false, Ordering::Relaxed);
    }

    /// Check if the service is ready to serve traffic.
    pub async fn is_ready(&self) -> bool {
        self.accepting.load(Ordering::Relaxed) && self.storage.is_healthy().await
    }

    /// Router exposing `/live` and `/ready`.
    pub fn routes(self) -> Router {
        Router::new()
            .route("/live", get(liveness))
            .route("/ready", get(readiness))
            .with_state(self)
    }
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: 200 only while the storage backend is healthy.
async fn readiness(State(state): State<HealthState>) -> impl IntoResponse {
    if state.is_ready().await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}
