//! Metrics collection and exposition.
//!
//! # Metrics
//! - `minter_submissions_total` (counter): mint requests accepted by the wallet
//! - `minter_submission_errors_total` (counter): mint requests that failed
//! - `minter_jobs_total` (counter): resolved jobs by outcome (minted, failed)
//! - `minter_not_ready_total` (counter): not-ready liveness checks by state
//! - `minter_confirmation_seconds` (histogram): submit-to-resolution time
//! - `minter_queue_cursor` (gauge): next queue index to process

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

use crate::health::LivenessState;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_submission(accepted: bool) {
    if accepted {
        metrics::counter!("minter_submissions_total").increment(1);
    } else {
        metrics::counter!("minter_submission_errors_total").increment(1);
    }
}

pub fn record_job_outcome(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("minter_jobs_total", "outcome" => outcome).increment(1);
    metrics::histogram!("minter_confirmation_seconds").record(elapsed.as_secs_f64());
}

pub fn record_not_ready(state: LivenessState) {
    metrics::counter!("minter_not_ready_total", "state" => state.as_str()).increment(1);
}

pub fn record_cursor(cursor: usize) {
    metrics::gauge!("minter_queue_cursor").set(cursor as f64);
}
