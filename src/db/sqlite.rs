//! SQLite connector implementation.

use crate::config::Credentials;
use crate::db::relational::{
    collect_rows, column_names, effective_sql, format_query_error, DecodeCell,
};
use crate::db::{not_connected, Backend, Connector, QueryResult, Value};
use crate::error::{ProxyError, Result};
use crate::query::Pagination;
use async_trait::async_trait;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Connection, Executor, Row, Statement, TypeInfo, ValueRef};
use std::str::FromStr;
use tracing::debug;

/// SQLite connector. The credentials' `dbname` is the database file path.
pub struct SqliteConnector {
    conn: Option<SqliteConnection>,
}

impl SqliteConnector {
    /// Creates an unconnected connector.
    pub fn new() -> Self {
        Self { conn: None }
    }

    /// Builds connect options. An empty `dbname` opens an in-memory database.
    pub fn connect_options(credentials: &Credentials) -> Result<SqliteConnectOptions> {
        if credentials.dbname.is_empty() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| ProxyError::connection(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&credentials.dbname)
            .create_if_missing(true))
    }
}

impl Default for SqliteConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    async fn connect(&mut self, credentials: &Credentials) -> Result<()> {
        let options = Self::connect_options(credentials)?;
        let conn = SqliteConnection::connect_with(&options).await.map_err(|e| {
            ProxyError::connection(format!("Cannot open '{}': {e}", credentials.dbname))
        })?;

        debug!("Opened SQLite database '{}'", credentials.dbname);
        self.conn = Some(conn);
        Ok(())
    }

    async fn execute_query(&mut self, query: &str, page: &Pagination) -> Result<QueryResult> {
        let conn = self.conn.as_mut().ok_or_else(not_connected)?;
        let sql = effective_sql(query, page, Backend::Sqlite.pagination_style());
        debug!("Executing on SQLite: {sql}");

        let statement = (&mut *conn)
            .prepare(&sql)
            .await
            .map_err(|e| ProxyError::query(format_query_error(e)))?;
        let columns = column_names(statement.columns());

        let rows = sqlx::query(&sql).fetch(&mut *conn);
        collect_rows::<Sqlite, _>(columns, rows).await
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|e| ProxyError::connection(format!("Failed to close connection: {e}")))?;
        }
        Ok(())
    }
}

impl DecodeCell for Sqlite {
    fn decode_cell(row: &SqliteRow, index: usize) -> std::result::Result<Value, sqlx::Error> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        // Storage class of this value (NULL, INTEGER, REAL, TEXT or BLOB),
        // never the declared column type
        let type_name = raw.type_info().name().to_uppercase();

        let value = match type_name.as_str() {
            "INTEGER" => Value::Int(row.try_get_unchecked(index)?),
            "REAL" => Value::Float(row.try_get_unchecked(index)?),
            "BLOB" => Value::from_bytes(row.try_get_unchecked::<&[u8], _>(index)?),
            _ => Value::String(row.try_get_unchecked(index)?),
        };

        Ok(value)
    }
}
