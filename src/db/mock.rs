//! Mock connector for testing.
//!
//! Records every lifecycle call into a shared log so tests can assert on
//! what the dispatcher did, and can be told to fail at any step.

use super::{Connector, QueryResult, Value};
use crate::config::Credentials;
use crate::error::{ProxyError, Result};
use crate::query::{paginate, Pagination, PaginationStyle};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// A lifecycle call observed by a [`MockConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorEvent {
    Connect,
    /// Carries the SQL the connector would have run.
    Execute(String),
    Close,
}

/// Shared, cloneable record of connector events.
#[derive(Debug, Clone, Default)]
pub struct ConnectorLog(Arc<Mutex<Vec<ConnectorEvent>>>);

impl ConnectorLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: ConnectorEvent) {
        if let Ok(mut events) = self.0.lock() {
            events.push(event);
        }
    }

    /// Returns a snapshot of the recorded events.
    pub fn events(&self) -> Vec<ConnectorEvent> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

/// A mock connector that returns a single canned row.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    log: ConnectorLog,
    connected: bool,
    fail_connect: bool,
    fail_query: bool,
    fail_close: bool,
}

impl MockConnector {
    /// Creates a mock that records into `log`.
    pub fn new(log: ConnectorLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn fail_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    pub fn fail_query(mut self) -> Self {
        self.fail_query = true;
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&mut self, _credentials: &Credentials) -> Result<()> {
        self.log.push(ConnectorEvent::Connect);
        if self.fail_connect {
            return Err(ProxyError::connection("mock connect failure"));
        }
        self.connected = true;
        Ok(())
    }

    async fn execute_query(&mut self, query: &str, page: &Pagination) -> Result<QueryResult> {
        if !self.connected {
            return Err(super::not_connected());
        }

        let sql = if page.is_requested() {
            paginate(query, page, PaginationStyle::LimitOffset)
        } else {
            query.to_string()
        };
        self.log.push(ConnectorEvent::Execute(sql.clone()));

        if self.fail_query {
            return Err(ProxyError::query("mock query failure"));
        }

        Ok(QueryResult::with_data(
            vec!["result".to_string()],
            vec![vec![Value::String(format!("Mock result for: {sql}"))]],
        ))
    }

    async fn close(&mut self) -> Result<()> {
        self.log.push(ConnectorEvent::Close);
        self.connected = false;
        if self.fail_close {
            return Err(ProxyError::connection("mock close failure"));
        }
        Ok(())
    }
}
