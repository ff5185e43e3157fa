//! Database abstraction layer for SQLSnap.
//!
//! Provides a trait-based interface over every supported backend, allowing
//! the dispatcher to drive relational databases and the key-value store
//! through the same connect / execute / close lifecycle.

pub mod mock;
mod mysql;
mod oracle;
mod postgres;
mod redis;
mod registry;
mod relational;
mod sqlite;
mod types;

pub use self::mysql::MySqlConnector;
pub use self::oracle::OracleConnector;
pub use self::postgres::PostgresConnector;
pub use self::redis::RedisConnector;
pub use mock::{ConnectorEvent, ConnectorLog, MockConnector};
pub use registry::{ConnectorFactory, DriverRegistry};
pub use sqlite::SqliteConnector;
pub use types::{QueryResult, Row, Value};

use crate::config::Credentials;
use crate::error::{ProxyError, Result};
use crate::query::{Pagination, PaginationStyle};
use async_trait::async_trait;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Postgres,
    MySql,
    Sqlite,
    Oracle,
    Redis,
}

impl Backend {
    /// Every registered backend.
    pub const ALL: [Backend; 5] = [
        Backend::Postgres,
        Backend::MySql,
        Backend::Sqlite,
        Backend::Oracle,
        Backend::Redis,
    ];

    /// Returns the identifier clients send in requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgresql",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
            Self::Oracle => "oracle",
            Self::Redis => "redis",
        }
    }

    /// Returns how this backend spells row-limiting clauses.
    pub fn pagination_style(&self) -> PaginationStyle {
        match self {
            Self::Oracle => PaginationStyle::OffsetFetch,
            _ => PaginationStyle::LimitOffset,
        }
    }
}

/// Creates a fresh, unconnected connector for the given backend.
pub fn connector_for(backend: Backend) -> Box<dyn Connector> {
    match backend {
        Backend::Postgres => Box::new(PostgresConnector::new()),
        Backend::MySql => Box::new(MySqlConnector::new()),
        Backend::Sqlite => Box::new(SqliteConnector::new()),
        Backend::Oracle => Box::new(OracleConnector::new()),
        Backend::Redis => Box::new(RedisConnector::new()),
    }
}

/// Trait defining the per-request lifecycle of a backend connection.
///
/// A connector is created for one request, connected once, queried once,
/// and closed once. Connections are never reused.
#[async_trait]
pub trait Connector: Send {
    /// Opens a connection using the given credentials.
    async fn connect(&mut self, credentials: &Credentials) -> Result<()>;

    /// Executes a query, applying `page` where the backend supports it.
    async fn execute_query(&mut self, query: &str, page: &Pagination) -> Result<QueryResult>;

    /// Releases the connection. Safe to call when not connected.
    async fn close(&mut self) -> Result<()>;
}

/// Error returned when a query is issued before `connect`.
pub(crate) fn not_connected() -> ProxyError {
    ProxyError::query("Database not connected")
}
