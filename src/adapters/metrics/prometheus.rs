//! Prometheus Metrics Registry - Service Observability
//!
//! Registers the scrapbook's counters and latency histogram and
//! renders them for the `/metrics` scrape endpoint.

use std::sync::Arc;

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tracing::error;

/// Centralized Prometheus metrics for the service.
///
/// All metrics follow the naming convention `scrapbook_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Entries written through the create route.
    pub entries_created: IntCounter,
    /// Entries removed through the delete route.
    pub entries_deleted: IntCounter,
    /// Photos stored through the upload route.
    pub photos_uploaded: IntCounter,
    /// Requests that ended in a server-side failure, by route.
    pub request_failures: IntCounterVec,
    /// Handler latency in seconds, by route.
    pub request_latency: HistogramVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let entries_created = IntCounter::new(
            "scrapbook_entries_created_total",
            "Total entries created or overwritten",
        )?;

        let entries_deleted = IntCounter::new(
            "scrapbook_entries_deleted_total",
            "Total entries deleted",
        )?;

        let photos_uploaded = IntCounter::new(
            "scrapbook_photos_uploaded_total",
            "Total photos uploaded",
        )?;

        let request_failures = IntCounterVec::new(
            Opts::new(
                "scrapbook_request_failures_total",
                "Requests that failed with a server error",
            ),
            &["route"],
        )?;

        let request_latency = HistogramVec::new(
            HistogramOpts::new(
                "scrapbook_request_latency_seconds",
                "Request handling latency in seconds",
            )
            .buckets(vec![0.005, 0.025, 0.1, 0.25, 1.0, 2.5, 10.0]),
            &["route"],
        )?;

        // Register all metrics
        registry.register(Box::new(entries_created.clone()))?;
        registry.register(Box::new(entries_deleted.clone()))?;
        registry.register(Box::new(photos_uploaded.clone()))?;
        registry.register(Box::new(request_failures.clone()))?;
        registry.register(Box::new(request_latency.clone()))?;

        Ok(Self {
            registry,
            entries_created,
            entries_deleted,
            photos_uploaded,
            request_failures,
            request_latency,
        })
    }

    /// Encode every registered metric in the text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Router exposing `GET /metrics`.
    pub fn routes(self: Arc<Self>) -> Router {
        Router::new()
            .route("/metrics", get(Self::scrape))
            .with_state(self)
    }

    async fn scrape(
        axum::extract::State(metrics): axum::extract::State<Arc<Self>>,
    ) -> impl IntoResponse {
        match metrics.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                body,
            ),
            Err(e) => {
                error!(error = %e, "Failed to encode metrics");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                    String::new(),
                )
            }
        }
    }
}
