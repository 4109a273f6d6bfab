//! Metrics collection and exposition.
//!
//! # Metrics
//! - `interceptor_decisions_total` (counter): dispatcher decisions by outcome
//! - `interceptor_completions_total` (counter): host completions by kind
//! - `interceptor_cancelled_total` (counter): claimed requests cancelled before completion
//!
//! # Design Decisions
//! - Recording without an installed recorder is a no-op, so tests need no setup
//! - Prometheus exporter is opt-in via `observability.metrics_enabled`

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(outcome: &'static str) {
    counter!("interceptor_decisions_total", "outcome" => outcome).increment(1);
}

pub fn record_completion(kind: &'static str) {
    counter!("interceptor_completions_total", "kind" => kind).increment(1);
}

pub fn record_cancelled() {
    counter!("interceptor_cancelled_total").increment(1);
}
