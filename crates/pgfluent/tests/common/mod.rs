#![allow(dead_code)]

use chrono::{DateTime, Utc};
use pgfluent::{Executor, FluentResult, RowMap, Tagged, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Route `pgfluent` events to the test output.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("pgfluent=trace"))
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default, Clone, PartialEq, Tagged)]
pub struct RowMeta {
    #[fluent(column = "row_count")]
    pub row_count: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Tagged)]
pub struct TestRow {
    #[fluent(nested)]
    pub meta: Option<Box<RowMeta>>,
    #[fluent(column = "id")]
    pub id: i64,
    #[fluent(column = "name")]
    pub name: String,
    #[fluent(column = "total")]
    pub total: f64,
    #[fluent(column = "is_active")]
    pub is_active: Option<bool>,
    #[fluent(column = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
    pub note: String,
}

/// One statement seen by [`StubExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub kind: &'static str,
    pub sql: String,
    pub args: Vec<Value>,
}

/// In-memory executor: records every statement and answers queries from a queue.
#[derive(Default)]
pub struct StubExecutor {
    recorded: Mutex<Vec<Recorded>>,
    results: Mutex<VecDeque<Vec<RowMap>>>,
}

impl StubExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows answered by the next query.
    pub fn with_rows(self, rows: Vec<RowMap>) -> Self {
        self.results.lock().unwrap().push_back(rows);
        self
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.recorded().pop().expect("no statement was executed")
    }

    fn record(&self, kind: &'static str, sql: &str, args: &[Value]) {
        self.recorded.lock().unwrap().push(Recorded {
            kind,
            sql: sql.to_string(),
            args: args.to_vec(),
        });
    }
}

impl Executor for StubExecutor {
    async fn execute(&self, sql: &str, args: &[Value]) -> FluentResult<u64> {
        self.record("execute", sql, args);
        Ok(1)
    }

    async fn query(&self, sql: &str, args: &[Value]) -> FluentResult<Vec<RowMap>> {
        self.record("query", sql, args);
        Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Build a row mapping from `(column, value)` pairs.
pub fn row<const N: usize>(pairs: [(&str, Value); N]) -> RowMap {
    pairs
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}
