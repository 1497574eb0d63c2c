//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (DATABASE_URL, BOOTSTRAP_MAX_ATTEMPTS)
//!     → validation.rs (semantic checks)
//!     → BootstrapConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, process_env, ConfigError};
pub use schema::BootstrapConfig;
pub use schema::DatabaseConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
