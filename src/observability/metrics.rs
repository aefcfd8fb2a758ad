//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by status and body kind
//! - `proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `proxy_rewrites_total` (counter): HTML documents rewritten
//! - `proxy_fetch_errors_total` (counter): failed fetches by reason
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record a completed proxy request.
pub fn record_request(kind: &'static str, status: u16, start: Instant) {
    metrics::counter!("proxy_requests_total", "status" => status.to_string(), "kind" => kind)
        .increment(1);
    metrics::histogram!("proxy_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record an HTML rewrite.
pub fn record_rewrite() {
    metrics::counter!("proxy_rewrites_total").increment(1);
}

/// Record a failed fetch.
pub fn record_fetch_error(reason: &'static str) {
    metrics::counter!("proxy_fetch_errors_total", "reason" => reason).increment(1);
}
