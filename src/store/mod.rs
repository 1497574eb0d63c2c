//! Store subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrapper (one attempt):
//!     → Store::connect (fresh connection, scoped to the attempt)
//!     → StoreConnection::execute (one call per plan statement)
//!     → StoreConnection::close (always, success or failure)
//! ```
//!
//! # Design Decisions
//! - Statements are opaque text; the store never parses them
//! - Failure classification happens here, where the driver error is known
//! - The bootstrapper only sees `StoreError` and asks `is_transient()`

pub mod sql;

use async_trait::async_trait;
use thiserror::Error;

pub use sql::SqlStore;

/// Boxed driver error kept as the source of a `StoreError`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by a store or one of its connections.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached, or dropped the connection mid-statement.
    #[error("store unavailable: {source}")]
    Unavailable {
        #[source]
        source: BoxError,
    },

    /// The store was reachable but refused the request.
    #[error("store rejected request: {source}")]
    Rejected {
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn unavailable(source: impl Into<BoxError>) -> Self {
        Self::Unavailable {
            source: source.into(),
        }
    }

    pub fn rejected(source: impl Into<BoxError>) -> Self {
        Self::Rejected {
            source: source.into(),
        }
    }

    /// Whether retrying the whole attempt could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Factory for per-attempt connections to the target database.
#[async_trait]
pub trait Store: Send + Sync {
    type Connection: StoreConnection;

    /// Open a fresh connection.
    async fn connect(&self) -> Result<Self::Connection, StoreError>;

    /// Human-readable target for logs. Must not leak credentials.
    fn describe(&self) -> String;
}

/// A single open connection, owned by one attempt.
#[async_trait]
pub trait StoreConnection: Send {
    /// Execute one raw statement.
    async fn execute(&mut self, statement: &str) -> Result<(), StoreError>;

    /// Release the connection.
    async fn close(self) -> Result<(), StoreError>;
}
