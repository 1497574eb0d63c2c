//! Schema plan: the ordered statements a bootstrap applies.
//!
//! # Ordering
//! ```text
//! Reset  ("drop ... if exists")
//!     → Schema (create tables, indexes)
//!     → Seed   (insert rows)
//! ```
//!
//! Statements run strictly in insertion order. Phases only label statements
//! for logs and errors; the builder keeps them grouped so that a plan always
//! resets before it creates.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stage of the plan a statement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Reset,
    Schema,
    Seed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Reset => "reset",
            Phase::Schema => "schema",
            Phase::Seed => "seed",
        };
        f.write_str(name)
    }
}

/// One opaque statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub phase: Phase,
    pub sql: String,
}

/// Errors raised while building a plan.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("schema plan has no statements")]
    Empty,

    #[error("{phase} statement #{position} is blank")]
    BlankStatement { phase: Phase, position: usize },
}

/// Validated, non-empty statement sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPlan {
    statements: Vec<Statement>,
}

impl SchemaPlan {
    pub fn builder() -> SchemaPlanBuilder {
        SchemaPlanBuilder::default()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn count(&self, phase: Phase) -> usize {
        self.statements.iter().filter(|s| s.phase == phase).count()
    }
}

/// Collects statements per phase and emits them reset → schema → seed.
#[derive(Debug, Default)]
pub struct SchemaPlanBuilder {
    reset: Vec<String>,
    schema: Vec<String>,
    seed: Vec<String>,
}

impl SchemaPlanBuilder {
    pub fn reset(mut self, sql: impl Into<String>) -> Self {
        self.reset.push(sql.into());
        self
    }

    pub fn schema(mut self, sql: impl Into<String>) -> Self {
        self.schema.push(sql.into());
        self
    }

    pub fn seed(mut self, sql: impl Into<String>) -> Self {
        self.seed.push(sql.into());
        self
    }

    pub fn extend<I, S>(mut self, phase: Phase, statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = match phase {
            Phase::Reset => &mut self.reset,
            Phase::Schema => &mut self.schema,
            Phase::Seed => &mut self.seed,
        };
        target.extend(statements.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<SchemaPlan, PlanError> {
        let groups = [
            (Phase::Reset, self.reset),
            (Phase::Schema, self.schema),
            (Phase::Seed, self.seed),
        ];

        let mut statements = Vec::new();
        for (phase, sqls) in groups {
            for (i, sql) in sqls.into_iter().enumerate() {
                if sql.trim().is_empty() {
                    return Err(PlanError::BlankStatement {
                        phase,
                        position: i + 1,
                    });
                }
                statements.push(Statement { phase, sql });
            }
        }

        if statements.is_empty() {
            return Err(PlanError::Empty);
        }

        Ok(SchemaPlan { statements })
    }
}
