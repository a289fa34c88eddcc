//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize metrics (call once at startup)
pub fn init_metrics() -> anyhow::Result<()> {
    PROMETHEUS_HANDLE.get_or_try_init(|| PrometheusBuilder::new().install_recorder())?;
    register_metrics();
    Ok(())
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "llm_relay_requests_total",
        "Total number of chat requests processed"
    );
    metrics::describe_histogram!(
        "llm_relay_request_duration_seconds",
        "Chat request duration in seconds, upstream call included"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping. Empty until
/// `init_metrics` has run.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

/// Record a chat request outcome
pub fn record_request(outcome: &str, provider: &str, duration_secs: f64) {
    metrics::counter!(
        "llm_relay_requests_total",
        "outcome" => outcome.to_string(),
        "provider" => provider.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "llm_relay_request_duration_seconds",
        "provider" => provider.to_string()
    )
    .record(duration_secs);
}
