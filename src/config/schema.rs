//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a bootstrap
//! run. All types derive Serde traits for deserialization from config files.

use std::net::{AddrParseError, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::plan::{Phase, PlanError, SchemaPlan};

/// Root configuration for the bootstrapper.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Target database.
    pub database: DatabaseConfig,

    /// Attempt budget and pacing.
    pub retry: RetryConfig,

    /// Statements to apply.
    pub plan: PlanConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; the scheme selects the driver.
    pub url: String,

    /// Connection establishment timeout in seconds (0 disables).
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            connect_timeout_secs: 5,
        }
    }
}

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 = single attempt).
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds.
    pub delay_ms: u64,

    /// Delay strategy.
    pub backoff: BackoffKind,

    /// Upper bound for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            delay_ms: 2000,
            backoff: BackoffKind::Fixed,
            max_delay_ms: 30_000,
        }
    }
}

/// Plan statements grouped by phase.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PlanConfig {
    /// Destructive reset ("drop ... if exists").
    pub reset: Vec<String>,

    /// Schema creation.
    pub schema: Vec<String>,

    /// Seed rows.
    pub seed: Vec<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Parsed `metrics_address`.
    pub fn metrics_socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.metrics_address.trim().parse()
    }
}

impl PlanConfig {
    /// Build the ordered plan: reset, then schema, then seed.
    pub fn build_plan(&self) -> Result<SchemaPlan, PlanError> {
        SchemaPlan::builder()
            .extend(Phase::Reset, self.reset.iter().cloned())
            .extend(Phase::Schema, self.schema.iter().cloned())
            .extend(Phase::Seed, self.seed.iter().cloned())
            .build()
    }
}
