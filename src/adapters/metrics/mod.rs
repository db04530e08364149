//! Metrics and Monitoring Adapters
//!
//! Provides the Prometheus scrape endpoint (/metrics) and health
//! check endpoints (/live, /ready), merged into the main router.

pub mod health;
pub mod prometheus;

pub use health::HealthState;
pub use self::prometheus::MetricsRegistry;
