//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lvs_probes_total` (counter): probes issued, by target
//! - `lvs_backend_health` (gauge): 1=up, 0=down, by target
//! - `lvs_transitions_total` (counter): state transitions, by target and state
//! - `lvs_reconcile_failures_total` (counter): failed LB calls, by operation
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Exposition via the Prometheus exporter, enabled by config

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one probe cycle for a target.
pub fn record_probe(target: &str) {
    counter!("lvs_probes_total", "target" => target.to_string()).increment(1);
}

/// Record a target's health after a transition.
pub fn record_backend_health(target: &str, up: bool) {
    gauge!("lvs_backend_health", "target" => target.to_string())
        .set(if up { 1.0 } else { 0.0 });
    counter!(
        "lvs_transitions_total",
        "target" => target.to_string(),
        "state" => if up { "up" } else { "down" }
    )
    .increment(1);
}

/// Count a failed load-balancer administrative call.
pub fn record_reconcile_failure(operation: &'static str) {
    counter!("lvs_reconcile_failures_total", "operation" => operation).increment(1);
}
