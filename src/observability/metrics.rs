//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rsvp_proxy_requests_total` (counter): forwarded requests by method, status
//! - `rsvp_proxy_upstream_duration_seconds` (histogram): upstream latency by outcome

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Count one client-facing RSVP response.
pub fn record_request(method: &'static str, status: u16) {
    ::metrics::counter!(
        "rsvp_proxy_requests_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record how long one upstream exchange took.
pub fn record_upstream(outcome: &'static str, elapsed: Duration) {
    ::metrics::histogram!("rsvp_proxy_upstream_duration_seconds", "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}
