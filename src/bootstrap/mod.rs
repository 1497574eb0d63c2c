//! Database bootstrap with bounded retry.
//!
//! # Data Flow
//! ```text
//! run(plan)
//!     → attempt.rs (connect, execute plan in order, close)
//!     → Success          → report, stop
//!     → FatalFailure     → error, stop
//!     → TransientFailure → budget left? wait (cancellable) and go again
//!                          otherwise RetriesExhausted
//! ```
//!
//! # Design Decisions
//! - Explicit loop bounded by `RetryPolicy::total_attempts`, no recursion
//! - The whole plan is retried from the top, never statement by statement
//! - Waits are `tokio::time::sleep`, so the runtime keeps serving other tasks
//! - Store is injected, so tests drive it with a scripted fake

mod attempt;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::BootstrapConfig;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::plan::SchemaPlan;
use crate::resilience::RetryPolicy;
use crate::store::{SqlStore, Store};

pub use attempt::run_attempt;
pub use types::{AttemptFailure, AttemptResult, BootstrapError, BootstrapReport, Stage};

/// Drives a store through a schema plan until it sticks or the budget runs out.
pub struct Bootstrapper<S> {
    store: S,
    policy: RetryPolicy,
    shutdown: Option<Arc<Shutdown>>,
}

impl<S: Store> Bootstrapper<S> {
    pub fn new(store: S, policy: RetryPolicy) -> Self {
        Self {
            store,
            policy,
            shutdown: None,
        }
    }

    /// Abort between attempts once `shutdown` has fired, even if it fired
    /// before this call.
    pub fn with_shutdown(mut self, shutdown: Arc<Shutdown>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Apply `plan`, retrying transient failures.
    pub async fn run(&mut self, plan: &SchemaPlan) -> Result<BootstrapReport, BootstrapError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "bootstrap",
            run_id = %run_id,
            database = %self.store.describe(),
        );

        self.run_attempts(plan, run_id).instrument(span).await
    }

    async fn run_attempts(
        &mut self,
        plan: &SchemaPlan,
        run_id: Uuid,
    ) -> Result<BootstrapReport, BootstrapError> {
        let started = Instant::now();
        let total = self.policy.total_attempts();

        tracing::info!(
            statements = plan.len(),
            max_attempts = self.policy.max_attempts,
            "Bootstrapping database"
        );

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            tracing::info!(attempt, total, "Bootstrap attempt starting");

            let failure = match run_attempt(&self.store, plan, self.policy.connect_timeout).await {
                AttemptResult::Success { statements } => {
                    let elapsed = started.elapsed();
                    metrics::record_attempt("success");
                    metrics::record_run("success", elapsed);
                    tracing::info!(
                        attempt,
                        statements,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Database bootstrapped"
                    );
                    return Ok(BootstrapReport {
                        run_id,
                        attempts: attempt,
                        statements,
                        elapsed_ms: elapsed.as_millis() as u64,
                    });
                }
                AttemptResult::FatalFailure(failure) => {
                    metrics::record_attempt("fatal");
                    tracing::error!(
                        attempt,
                        stage = %failure.stage,
                        error = %failure.error,
                        "Bootstrap failed with a non-retryable error"
                    );
                    return Err(self.finish(BootstrapError::fatal(attempt, failure), started));
                }
                AttemptResult::TransientFailure(failure) => failure,
            };

            metrics::record_attempt("transient");

            if !self.policy.should_retry(attempt) {
                tracing::error!(
                    attempts = attempt,
                    stage = %failure.stage,
                    error = %failure.error,
                    "Store still unavailable, no retries left"
                );
                let err = BootstrapError::RetriesExhausted {
                    attempts: attempt,
                    source: failure.error,
                };
                return Err(self.finish(err, started));
            }

            let delay = self.policy.delay_for(attempt);
            tracing::warn!(
                attempt,
                retries_left = total - attempt,
                delay_ms = delay.as_millis() as u64,
                stage = %failure.stage,
                error = %failure.error,
                "Store unavailable, retrying"
            );

            if self.wait(delay).await {
                tracing::warn!(attempts = attempt, "Shutdown requested, abandoning bootstrap");
                let err = BootstrapError::Cancelled {
                    attempts: attempt,
                    source: failure.error,
                };
                return Err(self.finish(err, started));
            }
        }
    }

    fn finish(&self, err: BootstrapError, started: Instant) -> BootstrapError {
        metrics::record_run(err.metric_label(), started.elapsed());
        err
    }

    /// Sleep for `delay`; true if shutdown was signalled first.
    async fn wait(&self, delay: Duration) -> bool {
        let Some(shutdown) = self.shutdown.as_ref() else {
            tokio::time::sleep(delay).await;
            return false;
        };

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => true,
            _ = tokio::time::sleep(delay) => false,
        }
    }
}

/// Bootstrap the database described by `config` with `plan`.
pub async fn run(
    config: &BootstrapConfig,
    plan: &SchemaPlan,
) -> Result<BootstrapReport, BootstrapError> {
    let store = SqlStore::new(config.database.url.clone());
    let policy = RetryPolicy::from_config(&config.retry, &config.database);
    Bootstrapper::new(store, policy).run(plan).await
}
