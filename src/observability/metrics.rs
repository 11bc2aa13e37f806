//! Metrics collection and exposition.
//!
//! # Metrics
//! - `plant_proxy_requests_total` (counter): proxied requests by route, status
//! - `plant_proxy_request_duration_seconds` (histogram): latency by route
//! - `plant_proxy_upstream_errors_total` (counter): failed upstream calls by route
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::RouteName;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished proxied request.
pub fn record_request(route: RouteName, status: u16, start: Instant) {
    counter!(
        "plant_proxy_requests_total",
        "route" => route.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("plant_proxy_request_duration_seconds", "route" => route.as_str())
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed upstream call.
pub fn record_upstream_error(route: RouteName) {
    counter!("plant_proxy_upstream_errors_total", "route" => route.as_str()).increment(1);
}
