//! Timeout enforcement for connection establishment.
//!
//! An expired deadline is reported as a transient store failure: a database
//! that is still starting up often accepts the TCP connection and then stalls.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
#[error("connection not established within {0:?}")]
pub struct ConnectTimeout(pub Duration);

/// Run `fut` under an optional deadline.
pub async fn with_connect_timeout<T, F>(limit: Option<Duration>, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match limit {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::unavailable(ConnectTimeout(limit))),
        },
        None => fut.await,
    }
}
