//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and, if enabled, the metrics exporter
//! - Build the schema plan and bootstrap the database
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The database is bootstrapped last, once everything observing it is up

use std::net::AddrParseError;
use std::path::PathBuf;
use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::bootstrap::{BootstrapError, BootstrapReport, Bootstrapper};
use crate::config::{load_config_with, process_env, ConfigError};
use crate::lifecycle::Shutdown;
use crate::observability::{logging, metrics};
use crate::plan::PlanError;
use crate::resilience::RetryPolicy;
use crate::store::{SqlStore, Store};

/// Resolves environment overrides such as `DATABASE_URL`.
pub type EnvLookup = fn(&str) -> Option<String>;

/// Inputs from the command line.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    pub config_path: PathBuf,
    /// Overrides `retry.max_attempts` after environment overrides.
    pub max_attempts: Option<u32>,
    pub env: EnvLookup,
}

impl StartupOptions {
    /// Options reading overrides from the process environment.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            max_attempts: None,
            env: process_env,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration from {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("failed to initialize logging")]
    Logging(#[source] TryInitError),

    #[error("invalid metrics address")]
    MetricsAddress(#[source] AddrParseError),

    #[error("failed to start metrics exporter")]
    Metrics(#[source] BuildError),

    #[error("invalid schema plan")]
    Plan(#[source] PlanError),

    #[error("database bootstrap failed")]
    Bootstrap(#[source] BootstrapError),
}

/// Run every startup step in order.
pub async fn run(
    options: StartupOptions,
    shutdown: Arc<Shutdown>,
) -> Result<BootstrapReport, StartupError> {
    let mut config =
        load_config_with(&options.config_path, options.env).map_err(|source| {
            StartupError::Config {
                path: options.config_path.clone(),
                source,
            }
        })?;
    if let Some(max_attempts) = options.max_attempts {
        config.retry.max_attempts = max_attempts;
    }

    logging::init(&config.observability).map_err(StartupError::Logging)?;
    tracing::info!(
        config = %options.config_path.display(),
        "db-bootstrap v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_socket_addr()
            .map_err(StartupError::MetricsAddress)?;
        metrics::init_metrics(addr).map_err(StartupError::Metrics)?;
    }

    let plan = config.plan.build_plan().map_err(StartupError::Plan)?;
    let store = SqlStore::new(config.database.url.clone());
    let policy = RetryPolicy::from_config(&config.retry, &config.database);

    tracing::info!(
        database = %store.describe(),
        max_attempts = policy.max_attempts,
        delay_ms = policy.delay.as_millis() as u64,
        backoff = ?policy.backoff,
        "Configuration loaded"
    );

    Bootstrapper::new(store, policy)
        .with_shutdown(shutdown)
        .run(&plan)
        .await
        .map_err(StartupError::Bootstrap)
}
