//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the plan is non-empty and has no blank statements
//! - Validate value ranges (backoff bounds, log level, metrics address)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BootstrapConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{BackoffKind, BootstrapConfig};
use crate::plan::PlanError;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("database.url must not be empty")]
    MissingDatabaseUrl,

    #[error("plan: {0}")]
    Plan(#[from] PlanError),

    #[error("retry.delay_ms must be greater than 0 for exponential backoff")]
    ZeroExponentialDelay,

    #[error("retry.max_delay_ms ({max_delay_ms}) is below retry.delay_ms ({delay_ms})")]
    MaxDelayBelowDelay { delay_ms: u64, max_delay_ms: u64 },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every error.
pub fn validate_config(config: &BootstrapConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.database.url.trim().is_empty() {
        errors.push(ValidationError::MissingDatabaseUrl);
    }

    if let Err(e) = config.plan.build_plan() {
        errors.push(e.into());
    }

    let retry = &config.retry;
    if retry.backoff == BackoffKind::Exponential {
        if retry.delay_ms == 0 {
            errors.push(ValidationError::ZeroExponentialDelay);
        }
        if retry.max_delay_ms < retry.delay_ms {
            errors.push(ValidationError::MaxDelayBelowDelay {
                delay_ms: retry.delay_ms,
                max_delay_ms: retry.max_delay_ms,
            });
        }
    }

    let obs = &config.observability;
    if !LOG_LEVELS.contains(&obs.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(obs.log_level.clone()));
    }
    if obs.metrics_enabled && obs.metrics_socket_addr().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            obs.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
