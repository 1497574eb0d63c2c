//! Attempt outcomes, run report and error definitions.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::plan::Phase;
use crate::store::StoreError;

/// Where inside an attempt a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    /// `index` is 1-based within the plan.
    Statement { index: usize, phase: Phase },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Connect => f.write_str("connect"),
            Stage::Statement { index, phase } => write!(f, "statement #{} ({})", index, phase),
        }
    }
}

/// A failed attempt: the stage it stopped at and the store's error.
#[derive(Debug)]
pub struct AttemptFailure {
    pub stage: Stage,
    pub error: StoreError,
}

/// Outcome of one attempt, consumed immediately by the retry loop.
#[derive(Debug)]
pub enum AttemptResult {
    Success { statements: usize },
    TransientFailure(AttemptFailure),
    FatalFailure(AttemptFailure),
}

impl AttemptResult {
    /// Classify a failure by asking the store error.
    pub fn failed(stage: Stage, error: StoreError) -> Self {
        let failure = AttemptFailure { stage, error };
        if failure.error.is_transient() {
            Self::TransientFailure(failure)
        } else {
            Self::FatalFailure(failure)
        }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub run_id: Uuid,
    /// Total attempts made, including the successful one.
    pub attempts: u32,
    /// Statements executed by the successful attempt.
    pub statements: usize,
    pub elapsed_ms: u64,
}

/// Terminal failure of a bootstrap run. The host must abort startup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A statement ran against a reachable store and was refused.
    #[error("statement #{index} ({phase}) failed on attempt {attempt}")]
    StatementExecution {
        attempt: u32,
        index: usize,
        phase: Phase,
        #[source]
        source: StoreError,
    },

    /// The store refused the connection itself (credentials, bad DSN).
    #[error("connection rejected on attempt {attempt}")]
    ConnectionRejected {
        attempt: u32,
        #[source]
        source: StoreError,
    },

    /// The store stayed unavailable for every allowed attempt.
    #[error("store still unavailable after {attempts} attempt(s)")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    /// Shutdown was requested while waiting to retry.
    #[error("bootstrap cancelled after {attempts} attempt(s)")]
    Cancelled {
        attempts: u32,
        #[source]
        source: StoreError,
    },
}

impl BootstrapError {
    /// Fatal error for a non-retryable failure on attempt `attempt`.
    pub fn fatal(attempt: u32, failure: AttemptFailure) -> Self {
        match failure.stage {
            Stage::Connect => Self::ConnectionRejected {
                attempt,
                source: failure.error,
            },
            Stage::Statement { index, phase } => Self::StatementExecution {
                attempt,
                index,
                phase,
                source: failure.error,
            },
        }
    }

    /// Attempts made before the run ended.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::StatementExecution { attempt, .. } | Self::ConnectionRejected { attempt, .. } => {
                *attempt
            }
            Self::RetriesExhausted { attempts, .. } | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// The store error that ended the run.
    pub fn cause(&self) -> &StoreError {
        match self {
            Self::StatementExecution { source, .. }
            | Self::ConnectionRejected { source, .. }
            | Self::RetriesExhausted { source, .. }
            | Self::Cancelled { source, .. } => source,
        }
    }

    /// Label used for the `bootstrap_runs_total` metric.
    pub(crate) fn metric_label(&self) -> &'static str {
        match self {
            Self::StatementExecution { .. } | Self::ConnectionRejected { .. } => "fatal",
            Self::RetriesExhausted { .. } => "exhausted",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}
