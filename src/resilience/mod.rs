//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap attempt:
//!     → timeouts.rs (bound connection establishment)
//!     → On transient failure: retries.rs (attempt budget, delay for next try)
//!     → backoff.rs (fixed or exponential delay with jitter)
//! ```
//!
//! # Design Decisions
//! - Attempt budget counts retries after the first try
//! - Only transient failures consume the budget; fatal ones end the run
//! - Fixed delay by default; exponential is opt-in

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::{Backoff, RetryPolicy};
