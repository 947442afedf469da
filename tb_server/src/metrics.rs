//! Prometheus metrics for the reservation server.
//!
//! When `METRICS_BIND` is configured, metrics are exported in Prometheus text
//! format on a separate listener. Without an installed exporter every
//! recording call is a no-op.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tb_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/reservations", 200);
//! metrics::reservations_created_total();
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
///
/// `path` should be the matched route template, not the raw URI.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Booking Metrics
// ============================================================================

/// Increment confirmed reservations counter.
pub fn reservations_created_total() {
    metrics::counter!("reservations_created_total").increment(1);
}

/// Increment rejected-for-overlap counter.
pub fn reservation_conflicts_total() {
    metrics::counter!("reservation_conflicts_total").increment(1);
}

/// Increment closed reservations counter, labelled by final status.
pub fn reservations_closed_total(outcome: &str) {
    metrics::counter!("reservations_closed_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

// ============================================================================
// Auth Metrics
// ============================================================================

/// Increment rejected API key counter.
pub fn api_key_rejections_total() {
    metrics::counter!("api_key_rejections_total").increment(1);
}
