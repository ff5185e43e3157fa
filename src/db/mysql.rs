//! MySQL connector implementation.

use crate::config::Credentials;
use crate::db::relational::{
    collect_rows, column_names, effective_sql, format_query_error, map_connection_error,
    DecodeCell,
};
use crate::db::{not_connected, Backend, Connector, QueryResult, Value};
use crate::error::{ProxyError, Result};
use crate::query::Pagination;
use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Connection, Executor, Row, Statement, TypeInfo, ValueRef};
use tracing::debug;

/// MySQL connector holding a single, unpooled connection.
pub struct MySqlConnector {
    conn: Option<MySqlConnection>,
}

impl MySqlConnector {
    /// Creates an unconnected connector.
    pub fn new() -> Self {
        Self { conn: None }
    }

    /// Builds connect options from credentials.
    ///
    /// Equivalent to the DSN `user:password@tcp(host:port)/dbname`; empty
    /// fields keep the driver default.
    pub fn connect_options(credentials: &Credentials) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new();

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

impl Default for MySqlConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(&mut self, credentials: &Credentials) -> Result<()> {
        let options = Self::connect_options(credentials);
        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(|e| map_connection_error(e, credentials))?;

        debug!("Connected to MySQL at {}", credentials.host_port());
        self.conn = Some(conn);
        Ok(())
    }

    async fn execute_query(&mut self, query: &str, page: &Pagination) -> Result<QueryResult> {
        let conn = self.conn.as_mut().ok_or_else(not_connected)?;
        let sql = effective_sql(query, page, Backend::MySql.pagination_style());
        debug!("Executing on MySQL: {sql}");

        let statement = (&mut *conn)
            .prepare(&sql)
            .await
            .map_err(|e| ProxyError::query(format_query_error(e)))?;
        let columns = column_names(statement.columns());

        // Text protocol: every cell arrives in its text form
        let rows = sqlx::raw_sql(&sql).fetch(&mut *conn);
        collect_rows::<MySql, _>(columns, rows).await
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

impl DecodeCell for MySql {
    fn decode_cell(row: &MySqlRow, index: usize) -> std::result::Result<Value, sqlx::Error> {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        let type_name = raw.type_info().name().to_uppercase();

        if type_name.ends_with(" UNSIGNED") {
            return Ok(Value::from(row.try_get::<u64, _>(index)?));
        }

        let value = match type_name.as_str() {
            "BOOLEAN" => Value::Bool(row.try_get(index)?),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                Value::Int(row.try_get(index)?)
            }
            "FLOAT" => Value::Float(row.try_get::<f32, _>(index)?.into()),
            "DOUBLE" => Value::Float(row.try_get(index)?),
            // DECIMAL, temporal, JSON, YEAR, BIT, binary and text columns keep
            // the server's rendering
            _ => Value::from_bytes(row.try_get_unchecked::<&[u8], _>(index)?),
        };

        Ok(value)
    }
}
