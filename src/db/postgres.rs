//! PostgreSQL connector implementation.
//!
//! Provides the `PostgresConnector` struct that implements the `Connector`
//! trait for PostgreSQL databases using sqlx.

use crate::config::Credentials;
use crate::db::relational::{
    collect_rows, column_names, effective_sql, format_query_error, map_connection_error,
    DecodeCell,
};
use crate::db::{not_connected, Backend, Connector, QueryResult, Value};
use crate::error::{ProxyError, Result};
use crate::query::Pagination;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow, PgSslMode};
use sqlx::{Connection, Executor, Postgres, Row, Statement, TypeInfo, ValueRef};
use tracing::debug;

/// PostgreSQL connector holding a single, unpooled connection.
pub struct PostgresConnector {
    conn: Option<PgConnection>,
}

impl PostgresConnector {
    /// Creates an unconnected connector.
    pub fn new() -> Self {
        Self { conn: None }
    }

    /// Builds connect options from credentials.
    ///
    /// Equivalent to the libpq string
    /// `host=.. port=.. user=.. password=.. dbname=.. sslmode=disable`;
    /// empty fields keep the driver default, as an empty libpq value would.
    pub fn connect_options(credentials: &Credentials) -> PgConnectOptions {
        let mut options = PgConnectOptions::new().ssl_mode(PgSslMode::Disable);

        if !credentials.host.is_empty() {
            options = options.host(&credentials.host);
        }
        if credentials.port != 0 {
            options = options.port(credentials.port);
        }
        if !credentials.user.is_empty() {
            options = options.username(&credentials.user);
        }
        if !credentials.password.is_empty() {
            options = options.password(&credentials.password);
        }
        if !credentials.dbname.is_empty() {
            options = options.database(&credentials.dbname);
        }

        options
    }
}

impl Default for PostgresConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    async fn connect(&mut self, credentials: &Credentials) -> Result<()> {
        let options = Self::connect_options(credentials);
        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| map_connection_error(e, credentials))?;

        debug!("Connected to PostgreSQL at {}", credentials.host_port());
        self.conn = Some(conn);
        Ok(())
    }

    async fn execute_query(&mut self, query: &str, page: &Pagination) -> Result<QueryResult> {
        let conn = self.conn.as_mut().ok_or_else(not_connected)?;
        let sql = effective_sql(query, page, Backend::Postgres.pagination_style());
        debug!("Executing on PostgreSQL: {sql}");

        let statement = (&mut *conn)
            .prepare(&sql)
            .await
            .map_err(|e| ProxyError::query(format_query_error(e)))?;
        let columns = column_names(statement.columns());

        // Simple-query protocol: every cell arrives in its text form
        let rows = sqlx::raw_sql(&sql).fetch(&mut *conn);
        collect_rows::<Postgres, _>(columns, rows).await
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

impl DecodeCell for Postgres {
    fn decode_cell(row: &PgRow, index: usize) -> std::result::Result<Value, sqlx::Error> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        let type_name = raw.type_info().name().to_uppercase();

        let value = match type_name.as_str() {
            "BOOL" => Value::Bool(row.try_get(index)?),
            "INT2" => Value::Int(row.try_get::<i16, _>(index)?.into()),
            "INT4" => Value::Int(row.try_get::<i32, _>(index)?.into()),
            "INT8" => Value::Int(row.try_get(index)?),
            "FLOAT4" => Value::Float(row.try_get::<f32, _>(index)?.into()),
            "FLOAT8" => Value::Float(row.try_get(index)?),
            "BYTEA" => Value::from_bytes(&row.try_get::<Vec<u8>, _>(index)?),
            "DATE" => Value::String(row.try_get::<NaiveDate, _>(index)?.to_string()),
            "TIME" => Value::String(row.try_get::<NaiveTime, _>(index)?.to_string()),
            "TIMESTAMP" => Value::String(row.try_get::<NaiveDateTime, _>(index)?.to_string()),
            "TIMESTAMPTZ" => Value::String(row.try_get::<DateTime<Utc>, _>(index)?.to_rfc3339()),
            // NUMERIC, UUID, JSON, OID, INTERVAL, INET, arrays, enums and the
            // rest are passed through in the server's text rendering
            _ => Value::String(row.try_get_unchecked(index)?),
        };

        Ok(value)
    }
}
