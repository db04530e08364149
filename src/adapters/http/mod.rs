//! HTTP API - axum Router for the Scrapbook Service
//!
//! Routes:
//! - `GET    /api/entries`          timeline (public)
//! - `GET    /api/entries/:date`    single entry (public)
//! - `POST   /api/entries/create`   create/overwrite (admin)
//! - `DELETE /api/entries/delete`   cascade delete (admin)
//! - `POST   /api/upload`           photo upload (admin)
//! - `POST   /api/auth/login|logout`
//! - `GET    <public_prefix>/:file` local uploads
//! - `/live`, `/ready`, `/metrics`

pub mod error;
pub mod routes;
pub mod session;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::adapters::metrics::{HealthState, MetricsRegistry};
use crate::config::LocalStorageConfig;
use crate::ports::converter::ImageConverter;
use crate::ports::storage::{StorageAdapter, StorageBackend};
use crate::usecases::{EntriesService, PhotoUploader};

pub use error::ApiError;
pub use session::{AdminSession, SessionGate};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub entries: EntriesService,
    pub uploader: PhotoUploader,
    pub session: Arc<SessionGate>,
    pub metrics: Arc<MetricsRegistry>,
    /// Readiness state; cleared on shutdown.
    pub health: HealthState,
    /// Directory served under `uploads_prefix`; `None` unless the
    /// local backend is active.
    pub local_uploads: Option<PathBuf>,
    /// Root-relative prefix of local upload URLs.
    pub uploads_prefix: String,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        converter: Arc<dyn ImageConverter>,
        session: SessionGate,
        metrics: Arc<MetricsRegistry>,
        local: &LocalStorageConfig,
    ) -> Self {
        let local_uploads =
            (storage.backend() == StorageBackend::Local).then(|| PathBuf::from(&local.uploads_dir));

        Self {
            health: HealthState::new(Arc::clone(&storage)),
            entries: EntriesService::new(Arc::clone(&storage)),
            uploader: PhotoUploader::new(storage, converter),
            session: Arc::new(session),
            metrics,
            local_uploads,
            uploads_prefix: local.public_prefix.trim_end_matches('/').to_string(),
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    let health = state.health.clone();
    let metrics = Arc::clone(&state.metrics);
    let uploads_route = format!("{}/:filename", state.uploads_prefix);

    Router::new()
        .route("/api/entries", get(routes::list_entries))
        .route("/api/entries/create", post(routes::create_entry))
        .route("/api/entries/delete", delete(routes::delete_entry))
        .route("/api/entries/:date", get(routes::get_entry))
        .route("/api/upload", post(routes::upload_photo))
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/logout", post(routes::logout))
        .route(&uploads_route, get(routes::serve_upload))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
        .merge(health.routes())
        .merge(metrics.routes())
}

/// Serve `app` on `listener` until the shutdown signal fires.
///
/// Peer addresses are attached to each request for the login limiter.
#[instrument(skip_all)]
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    info!(address = %listener.local_addr()?, "HTTP server started");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    Ok(())
}
