//! SQL store backed by sqlx's `Any` driver.
//!
//! The URL scheme picks the driver (`postgres://`, `sqlite://`), so one
//! bootstrapper serves every service regardless of dialect.

use async_trait::async_trait;
use sqlx::any::install_default_drivers;
use sqlx::{AnyConnection, Connection, Executor};
use url::Url;

use crate::store::{Store, StoreConnection, StoreError};

/// PostgreSQL SQLSTATE codes that mean "try again later".
const TRANSIENT_SQLSTATES: &[&str] = &["57P01", "57P02", "57P03", "53300"];

/// Store that opens a new sqlx connection per attempt.
#[derive(Debug, Clone)]
pub struct SqlStore {
    url: String,
}

impl SqlStore {
    pub fn new(url: impl Into<String>) -> Self {
        install_default_drivers();
        Self { url: url.into() }
    }
}

#[async_trait]
impl Store for SqlStore {
    type Connection = SqlConnection;

    async fn connect(&self) -> Result<SqlConnection, StoreError> {
        let inner = AnyConnection::connect(&self.url).await.map_err(classify)?;
        Ok(SqlConnection { inner })
    }

    fn describe(&self) -> String {
        redact_url(&self.url)
    }
}

/// Connection handed out by `SqlStore`.
pub struct SqlConnection {
    inner: AnyConnection,
}

#[async_trait]
impl StoreConnection for SqlConnection {
    async fn execute(&mut self, statement: &str) -> Result<(), StoreError> {
        Executor::execute(&mut self.inner, statement)
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn close(self) -> Result<(), StoreError> {
        self.inner.close().await.map_err(classify)
    }
}

/// Map a driver error onto the transient/fatal split.
///
/// Only transport failures and server-side unavailability are transient.
/// `Protocol` errors are fatal: sqlx raises them for unsupported auth
/// mechanisms and unexpected messages, which no retry fixes.
pub fn classify(err: sqlx::Error) -> StoreError {
    if is_transient(&err) {
        StoreError::unavailable(err)
    } else {
        StoreError::rejected(err)
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db
            .code()
            .map(|code| is_transient_sqlstate(&code))
            .unwrap_or(false),
        _ => false,
    }
}

/// Class 08 is "connection exception"; the rest are server-side unavailability.
fn is_transient_sqlstate(code: &str) -> bool {
    code.starts_with("08") || TRANSIENT_SQLSTATES.contains(&code)
}

/// Mask the password of a URL-form DSN.
pub fn redact_url(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<unparsed connection string>".to_string(),
    }
}
