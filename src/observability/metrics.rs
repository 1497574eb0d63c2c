//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bootstrap_attempts_total` (counter): attempts by outcome
//!   (`success`, `transient`, `fatal`)
//! - `bootstrap_runs_total` (counter): finished runs by result
//!   (`success`, `exhausted`, `fatal`, `cancelled`)
//! - `bootstrap_duration_seconds` (histogram): wall time of a run

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_attempt(outcome: &'static str) {
    ::metrics::counter!("bootstrap_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_run(result: &'static str, elapsed: Duration) {
    ::metrics::counter!("bootstrap_runs_total", "result" => result).increment(1);
    ::metrics::histogram!("bootstrap_duration_seconds").record(elapsed.as_secs_f64());
}
