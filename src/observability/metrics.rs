//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by route, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency by route
//! - `gateway_upstream_calls_total` (counter): upstream calls by endpoint, outcome
//! - `gateway_gamepasses_aggregated_total` (counter): rows returned to callers
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one inbound request.
pub fn record_request(route: String, status: u16, start: Instant) {
    let status = status.to_string();
    counter!("gateway_requests_total", "route" => route.clone(), "status" => status).increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call.
pub fn record_upstream_call(endpoint: &'static str, outcome: &'static str) {
    counter!("gateway_upstream_calls_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
}

pub fn record_gamepasses_aggregated(count: usize) {
    counter!("gateway_gamepasses_aggregated_total").increment(count as u64);
}
