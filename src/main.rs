//! Database bootstrap runner.
//!
//! Applies a service's schema plan before the service starts, waiting for a
//! database that may still be coming up.
//!
//! # Architecture Overview
//!
//! ```text
//!   bootstrap.toml ──▶ config ──▶ lifecycle::startup
//!                                     │
//!                                     ▼
//!                             ┌──────────────────┐   transient failure
//!                             │   Bootstrapper   │◀──────────────┐
//!                             └────────┬─────────┘               │
//!                                      │ one attempt             │ wait
//!                                      ▼                         │ (retry policy)
//!                             ┌──────────────────┐               │
//!                             │ store (sqlx Any) │───────────────┘
//!                             │ connect → plan → │
//!                             │      close       │
//!                             └────────┬─────────┘
//!                                      │ success / fatal / exhausted
//!                                      ▼
//!                                exit status 0 / 1
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use db_bootstrap::lifecycle::signals::spawn_signal_handler;
use db_bootstrap::lifecycle::startup::{self, StartupOptions};
use db_bootstrap::lifecycle::Shutdown;

#[derive(Parser)]
#[command(name = "db-bootstrap")]
#[command(about = "Create and seed a service database, retrying until it is reachable", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "bootstrap.toml")]
    config: PathBuf,

    /// Retries after the first attempt (overrides config and environment).
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_handler(shutdown.clone());

    let options = StartupOptions {
        max_attempts: cli.max_attempts,
        ..StartupOptions::new(cli.config)
    };

    match startup::run(options, shutdown).await {
        Ok(report) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: failed to encode report: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!(
                    "Database bootstrapped: {} statement(s) after {} attempt(s) in {} ms",
                    report.statements, report.attempts, report.elapsed_ms
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Startup aborted");
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
