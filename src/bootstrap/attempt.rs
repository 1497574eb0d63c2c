//! A single bootstrap attempt.
//!
//! Connect, run every statement in order, close. The connection never
//! outlives the attempt, whatever the outcome.

use std::time::Duration;

use crate::bootstrap::types::{AttemptResult, Stage};
use crate::plan::SchemaPlan;
use crate::resilience::timeouts::with_connect_timeout;
use crate::store::{Store, StoreConnection, StoreError};

pub async fn run_attempt<S: Store>(
    store: &S,
    plan: &SchemaPlan,
    connect_timeout: Option<Duration>,
) -> AttemptResult {
    let mut conn = match with_connect_timeout(connect_timeout, store.connect()).await {
        Ok(conn) => conn,
        Err(error) => return AttemptResult::failed(Stage::Connect, error),
    };

    let outcome = execute_plan(&mut conn, plan).await;

    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, "Connection did not close cleanly");
    }

    match outcome {
        Ok(statements) => AttemptResult::Success { statements },
        Err((stage, error)) => AttemptResult::failed(stage, error),
    }
}

/// Stops at the first failing statement.
async fn execute_plan<C: StoreConnection>(
    conn: &mut C,
    plan: &SchemaPlan,
) -> Result<usize, (Stage, StoreError)> {
    for (i, statement) in plan.statements().iter().enumerate() {
        let index = i + 1;
        tracing::debug!(index, phase = %statement.phase, "Executing statement");

        conn.execute(&statement.sql).await.map_err(|error| {
            (
                Stage::Statement {
                    index,
                    phase: statement.phase,
                },
                error,
            )
        })?;
    }

    Ok(plan.len())
}
