//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use db_bootstrap::plan::SchemaPlan;
use db_bootstrap::store::{Store, StoreConnection, StoreError};

/// What the fake does when asked for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connect {
    Accept,
    /// Transient: nothing is listening yet.
    Refuse,
    /// Fatal: the server answers but refuses the credentials.
    Reject,
    /// Never completes; only a connect timeout gets past it.
    Hang,
}

/// How a matching statement fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFailure {
    /// Fatal: syntax or constraint error.
    Rejected,
    /// Transient: the server went away mid-statement.
    Dropped,
}

struct StatementRule {
    needle: String,
    failure: StatementFailure,
    remaining: Option<u32>,
}

struct FakeState {
    script: VecDeque<Connect>,
    fallback: Connect,
    rules: Vec<StatementRule>,
    connects: u32,
    closes: u32,
    calls: Vec<String>,
    executed: Vec<String>,
}

/// Scripted in-memory store.
#[derive(Clone)]
pub struct FakeStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    fn with_fallback(fallback: Connect) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                script: VecDeque::new(),
                fallback,
                rules: Vec::new(),
                connects: 0,
                closes: 0,
                calls: Vec::new(),
                executed: Vec::new(),
            })),
        }
    }

    pub fn reachable() -> Self {
        Self::with_fallback(Connect::Accept)
    }

    pub fn unreachable() -> Self {
        Self::with_fallback(Connect::Refuse)
    }

    /// Refuses the first `attempts` connections, then accepts.
    pub fn unavailable_for(attempts: u32) -> Self {
        let store = Self::reachable();
        store.script((0..attempts).map(|_| Connect::Refuse));
        store
    }

    /// Queue connect behaviours ahead of the fallback.
    pub fn script(&self, steps: impl IntoIterator<Item = Connect>) {
        self.state.lock().unwrap().script.extend(steps);
    }

    /// Fail every statement containing `needle`.
    pub fn fail_statement(&self, needle: &str, failure: StatementFailure) {
        self.add_rule(needle, failure, None);
    }

    /// Fail statements containing `needle` for the first `times` matches only.
    pub fn fail_statement_times(&self, needle: &str, failure: StatementFailure, times: u32) {
        self.add_rule(needle, failure, Some(times));
    }

    fn add_rule(&self, needle: &str, failure: StatementFailure, remaining: Option<u32>) {
        self.state.lock().unwrap().rules.push(StatementRule {
            needle: needle.to_string(),
            failure,
            remaining,
        });
    }

    pub fn connects(&self) -> u32 {
        self.state.lock().unwrap().connects
    }

    pub fn closes(&self) -> u32 {
        self.state.lock().unwrap().closes
    }

    /// Every statement the bootstrapper sent, including failed ones.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Statements that succeeded.
    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }
}

#[async_trait]
impl Store for FakeStore {
    type Connection = FakeConnection;

    async fn connect(&self) -> Result<FakeConnection, StoreError> {
        let behaviour = {
            let mut state = self.state.lock().unwrap();
            state.connects += 1;
            let fallback = state.fallback;
            state.script.pop_front().unwrap_or(fallback)
        };

        match behaviour {
            Connect::Accept => Ok(FakeConnection {
                state: self.state.clone(),
            }),
            Connect::Refuse => Err(StoreError::unavailable(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            Connect::Reject => Err(StoreError::rejected(
                "password authentication failed for user \"admin\"",
            )),
            Connect::Hang => std::future::pending().await,
        }
    }

    fn describe(&self) -> String {
        "fake://discountdb/DiscountDb".to_string()
    }
}

pub struct FakeConnection {
    state: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl StoreConnection for FakeConnection {
    async fn execute(&mut self, statement: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(statement.to_string());

        let mut failure = None;
        for rule in state.rules.iter_mut() {
            if !statement.contains(rule.needle.as_str()) {
                continue;
            }
            match rule.remaining {
                Some(0) => continue,
                Some(ref mut n) => *n -= 1,
                None => {}
            }
            failure = Some(rule.failure);
            break;
        }

        match failure {
            Some(StatementFailure::Rejected) => Err(StoreError::rejected(format!(
                "syntax error in \"{}\"",
                statement
            ))),
            Some(StatementFailure::Dropped) => Err(StoreError::unavailable(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))),
            None => {
                state.executed.push(statement.to_string());
                Ok(())
            }
        }
    }

    async fn close(self) -> Result<(), StoreError> {
        self.state.lock().unwrap().closes += 1;
        Ok(())
    }
}

/// The discount service's coupon plan.
pub fn coupon_plan() -> SchemaPlan {
    SchemaPlan::builder()
        .reset("DROP TABLE IF EXISTS coupon")
        .schema(
            "CREATE TABLE coupon (id INTEGER PRIMARY KEY, product_name VARCHAR(24) NOT NULL, \
             description TEXT, amount INTEGER)",
        )
        .seed(
            "INSERT INTO coupon (product_name, description, amount) \
             VALUES ('IPhone X', 'IPhone Discount', 100)",
        )
        .seed(
            "INSERT INTO coupon (product_name, description, amount) \
             VALUES ('Samsung 10', 'Samsung Discount', 150)",
        )
        .build()
        .unwrap()
}

/// A log event seen by `CaptureLayer`.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: HashMap<String, String>,
}

#[derive(Default)]
struct FieldVisitor {
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let message = visitor.fields.remove("message").unwrap_or_default();

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields: visitor.fields,
        });
    }
}

/// Handle on the events captured for the current thread.
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

impl LogCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn find(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }
}

/// Capture every event emitted on this thread until the handle is dropped.
pub fn capture_logs() -> LogCapture {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        events: events.clone(),
    });
    let guard = tracing::subscriber::set_default(subscriber);
    LogCapture {
        events,
        _guard: guard,
    }
}
