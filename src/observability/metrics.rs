//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rest_requests_total` (counter): requests by action and envelope error code
//! - `rest_request_duration_seconds` (histogram): dispatch latency by action
//! - `rest_restarts_total` (counter): in-process restarts executed
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Serve Prometheus metrics on `addr`. Must run inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched request. An empty action means no route matched.
pub fn record_request(action: &str, error: i64, start: Instant) {
    let action = if action.is_empty() { "unmatched" } else { action };
    ::metrics::counter!(
        "rest_requests_total",
        "action" => action.to_string(),
        "error" => error.to_string()
    )
    .increment(1);
    ::metrics::histogram!("rest_request_duration_seconds", "action" => action.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_restart() {
    ::metrics::counter!("rest_restarts_total").increment(1);
}
