//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging/metrics → Build plan → Bootstrap database
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → bootstrap stops before next retry
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then observability, then the database
//! - Fail fast: any startup error is fatal to the process
//! - Cancellation is only observed between attempts

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
