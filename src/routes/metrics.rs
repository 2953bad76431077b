//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "tokenscope_requests_total",
        "Total number of count requests by outcome"
    );
    metrics::describe_histogram!(
        "tokenscope_request_duration_seconds",
        "Count request duration in seconds"
    );
    metrics::describe_counter!(
        "tokenscope_tokens_counted_total",
        "Input tokens reported by providers"
    );
    metrics::describe_counter!(
        "tokenscope_provider_errors_total",
        "Failed provider token count calls"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a count request
pub fn record_request(status: &str, model: &str, duration_secs: f64) {
    metrics::counter!("tokenscope_requests_total", "status" => status.to_string(), "model" => model.to_string())
        .increment(1);
    metrics::histogram!("tokenscope_request_duration_seconds", "model" => model.to_string())
        .record(duration_secs);
}

/// Record tokens counted by a provider
pub fn record_tokens(provider: &str, model: &str, count: u64) {
    metrics::counter!(
        "tokenscope_tokens_counted_total",
        "provider" => provider.to_string(),
        "model" => model.to_string()
    )
    .increment(count);
}
