//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shield_decisions_total` (counter): decisions by category and reason
//! - `shield_excluded_requests_total` (counter): requests that bypassed the shield
//! - `shield_upstream_duration_seconds` (histogram): forwarding latency by status
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::security::Decision;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_decision(decision: &Decision) {
    metrics::counter!(
        "shield_decisions_total",
        "category" => decision.category.as_str(),
        "reason" => decision.reason_code.as_str()
    )
    .increment(1);
}

pub fn record_excluded() {
    metrics::counter!("shield_excluded_requests_total").increment(1);
}

pub fn record_upstream(status: u16, start: Instant) {
    metrics::histogram!(
        "shield_upstream_duration_seconds",
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
