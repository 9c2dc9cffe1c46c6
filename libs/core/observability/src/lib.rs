//! Observability utilities for the ScholarPath API.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Scholarship search and save metrics
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, ScholarshipMetrics, SearchStrategyLabel};
//!
//! init_metrics();
//!
//! ScholarshipMetrics::record_search(SearchStrategyLabel::AllFields, 12);
//!
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod middleware;
pub mod scholarships;

pub use middleware::metrics_middleware;
pub use scholarships::{SaveOutcome, ScholarshipMetrics, SearchStrategyLabel, VectorSearchOutcome};

pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at startup. Later calls return the already-installed handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_histogram;

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    describe_counter!(
        "scholarship_searches_total",
        "Scholarship searches by matching strategy"
    );
    describe_histogram!(
        "scholarship_search_results",
        "Number of scholarships returned per search"
    );
    describe_counter!(
        "scholarship_vector_searches_total",
        "Vector searches by outcome (semantic or fallback)"
    );
    describe_counter!(
        "scholarship_saves_total",
        "Save requests by outcome"
    );
    describe_counter!(
        "scholarship_store_read_failures_total",
        "Store reads that degraded to an empty result"
    );
}
