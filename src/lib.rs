//! Startup-time database bootstrap with bounded retry.
//!
//! Services call [`bootstrap::run`] (or drive a [`Bootstrapper`] with their
//! own [`store::Store`]) before accepting traffic. The plan is applied in
//! full on a fresh connection per attempt; transient unavailability is
//! retried, anything else ends startup.

pub mod bootstrap;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod plan;
pub mod resilience;
pub mod store;

pub use bootstrap::{BootstrapError, BootstrapReport, Bootstrapper};
pub use config::schema::BootstrapConfig;
pub use lifecycle::Shutdown;
pub use plan::{Phase, SchemaPlan};
pub use resilience::RetryPolicy;
