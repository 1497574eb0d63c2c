//! Retry policy for bootstrap attempts.
//!
//! # Responsibilities
//! - Hold the attempt budget (`max_attempts` retries after the first try)
//! - Compute the wait before each retry
//! - Carry the optional connect deadline applied to every attempt

use std::time::Duration;

use crate::config::schema::{BackoffKind, DatabaseConfig, RetryConfig};
use crate::resilience::backoff::calculate_backoff;

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Wait the base delay every time.
    Fixed,
    /// Double the base delay per retry, capped, with up to 10% jitter.
    Exponential { max_delay: Duration },
}

/// Bounds and pacing of a bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_attempts: u32,
    /// Base delay between attempts.
    pub delay: Duration,
    pub backoff: Backoff,
    /// Deadline for establishing each connection.
    pub connect_timeout: Option<Duration>,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: Backoff::Fixed,
            connect_timeout: None,
        }
    }

    pub fn exponential(max_attempts: u32, delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: Backoff::Exponential { max_delay },
            connect_timeout: None,
        }
    }

    pub fn with_connect_timeout(mut self, limit: Duration) -> Self {
        self.connect_timeout = Some(limit);
        self
    }

    pub fn from_config(retry: &RetryConfig, database: &DatabaseConfig) -> Self {
        let delay = Duration::from_millis(retry.delay_ms);
        let backoff = match retry.backoff {
            BackoffKind::Fixed => Backoff::Fixed,
            BackoffKind::Exponential => Backoff::Exponential {
                max_delay: Duration::from_millis(retry.max_delay_ms),
            },
        };
        let connect_timeout = match database.connect_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            max_attempts: retry.max_attempts,
            delay,
            backoff,
            connect_timeout,
        }
    }

    /// Total tries a run may make: the first one plus every retry.
    pub fn total_attempts(&self) -> u32 {
        self.max_attempts.saturating_add(1)
    }

    /// Whether another attempt is allowed after `attempts_made` tries.
    pub fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made < self.total_attempts()
    }

    /// Wait before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential { max_delay } => calculate_backoff(retry, self.delay, max_delay),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(50, Duration::from_secs(2))
    }
}
