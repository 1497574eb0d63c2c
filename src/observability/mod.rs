//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrapper produces:
//!     → logging.rs (structured log events, one span per run)
//!     → metrics.rs (attempt and run counters, duration histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape), optional
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Run ID flows through every event of a bootstrap run
//! - Metrics go through the `metrics` facade; with no recorder they are no-ops

pub mod logging;
pub mod metrics;
