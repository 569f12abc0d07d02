//! In-memory connector used by the runner tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bench_runner::{Connection, Connector, DbError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Connector whose connections always succeed unless told otherwise.
#[derive(Default)]
pub struct StubConnector {
    /// Connections beyond this many fail.
    pub max_connections: Option<usize>,
    /// Delay applied to every statement.
    pub delay: Duration,
    /// Statements containing this text fail.
    pub reject: Option<String>,
    /// Rows returned by each query.
    pub query_rows: u64,
    pub connects: AtomicUsize,
    pub statements: Arc<Mutex<Vec<String>>>,
    /// Called as each statement starts executing.
    pub on_statement: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl StubConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for StubConnector {
    async fn connect(&self) -> Result<Box<dyn Connection>, DbError> {
        let n = self.connects.fetch_add(1, Ordering::SeqCst);
        if self.max_connections.is_some_and(|max| n >= max) {
            return Err(DbError::Connection("too many clients already".to_string()));
        }
        Ok(Box::new(StubConnection {
            delay: self.delay,
            reject: self.reject.clone(),
            query_rows: self.query_rows,
            statements: self.statements.clone(),
            on_statement: self.on_statement.clone(),
        }))
    }
}

struct StubConnection {
    delay: Duration,
    reject: Option<String>,
    query_rows: u64,
    statements: Arc<Mutex<Vec<String>>>,
    on_statement: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl StubConnection {
    async fn run(&self, statement: &str) -> Result<(), DbError> {
        if let Some(hook) = &self.on_statement {
            hook();
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.statements.lock().unwrap().push(statement.to_string());
        match &self.reject {
            Some(pattern) if statement.contains(pattern.as_str()) => {
                Err(DbError::Statement(format!("rejected: {pattern}")))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Connection for StubConnection {
    async fn execute(&mut self, statement: &str) -> Result<u64, DbError> {
        self.run(statement).await?;
        // Bulk inserts report the whole batch
        Ok(u64::MAX)
    }

    async fn execute_pipelined(&mut self, statements: &[String]) -> Vec<Result<u64, DbError>> {
        let mut results = Vec::with_capacity(statements.len());
        for statement in statements {
            results.push(self.run(statement).await.map(|_| 1));
        }
        results
    }

    async fn query(&mut self, statement: &str) -> Result<u64, DbError> {
        self.run(statement).await?;
        Ok(self.query_rows)
    }
}
