//! Oracle connector implementation.
//!
//! The `oracle` driver is blocking, so every call into it runs on the
//! blocking thread pool.

use crate::config::Credentials;
use crate::db::{not_connected, Backend, Connector, QueryResult, Row, Value};
use crate::error::{ProxyError, Result};
use crate::query::{paginate, strip_terminator, Pagination};
use ::oracle::sql_type::OracleType;
use ::oracle::{Connection, SqlValue};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Oracle connector. The credentials' `dbname` is the service name.
pub struct OracleConnector {
    conn: Option<Arc<Connection>>,
}

impl OracleConnector {
    /// Creates an unconnected connector.
    pub fn new() -> Self {
        Self { conn: None }
    }

    /// Builds the EZConnect string `//host:port/service`.
    pub fn connect_string(credentials: &Credentials) -> String {
        format!(
            "//{}:{}/{}",
            credentials.host, credentials.port, credentials.dbname
        )
    }

    /// Returns the statement text to send. Oracle rejects a trailing `;`.
    pub fn effective_sql(query: &str, page: &Pagination) -> String {
        if page.is_requested() {
            paginate(query, page, Backend::Oracle.pagination_style())
        } else {
            strip_terminator(query).to_string()
        }
    }
}

impl Default for OracleConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a blocking closure off the async runtime.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ProxyError::internal(format!("Oracle worker failed: {e}")))?
}

#[async_trait]
impl Connector for OracleConnector {
    async fn connect(&mut self, credentials: &Credentials) -> Result<()> {
        let user = credentials.user.clone();
        let password = credentials.password.clone();
        let connect_string = Self::connect_string(credentials);

        let conn = run_blocking(move || {
            let mut conn = Connection::connect(&user, &password, &connect_string)
                .map_err(|e| ProxyError::connection(e.to_string()))?;
            conn.set_autocommit(true);
            Ok(conn)
        })
        .await?;

        debug!("Connected to Oracle at {}", credentials.host_port());
        self.conn = Some(Arc::new(conn));
        Ok(())
    }

    async fn execute_query(&mut self, query: &str, page: &Pagination) -> Result<QueryResult> {
        let conn = Arc::clone(self.conn.as_ref().ok_or_else(not_connected)?);
        let sql = Self::effective_sql(query, page);
        debug!("Executing on Oracle: {sql}");

        run_blocking(move || execute_blocking(&conn, &sql)).await
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            run_blocking(move || {
                conn.close()
                    .map_err(|e| ProxyError::connection(format!("Failed to close connection: {e}")))
            })
            .await?;
        }
        Ok(())
    }
}

fn execute_blocking(conn: &Connection, sql: &str) -> Result<QueryResult> {
    let mut stmt = conn
        .statement(sql)
        .build()
        .map_err(|e| ProxyError::query(e.to_string()))?;

    if !stmt.is_query() {
        stmt.execute(&[])
            .map_err(|e| ProxyError::query(e.to_string()))?;
        return Ok(QueryResult::new());
    }

    let rows = stmt
        .query(&[])
        .map_err(|e| ProxyError::query(e.to_string()))?;

    let columns: Vec<String> = rows
        .column_info()
        .iter()
        .map(|col| col.name().to_string())
        .collect();

    let mut data: Vec<Row> = Vec::new();
    for row_result in rows {
        let row = row_result.map_err(|e| ProxyError::query(format!("Error reading rows: {e}")))?;
        let cells = row
            .sql_values()
            .iter()
            .map(decode_value)
            .collect::<std::result::Result<Row, _>>()
            .map_err(|e| ProxyError::query(format!("Failed to scan row: {e}")))?;
        data.push(cells);
    }

    Ok(QueryResult::with_data(columns, data))
}

fn decode_value(value: &SqlValue) -> std::result::Result<Value, ::oracle::Error> {
    if value.is_null()? {
        return Ok(Value::Null);
    }

    let decoded = match value.oracle_type()? {
        OracleType::Boolean => Value::Bool(value.get()?),
        OracleType::Int64 => Value::Int(value.get()?),
        OracleType::UInt64 => Value::from(value.get::<u64>()?),
        OracleType::BinaryFloat | OracleType::BinaryDouble => Value::Float(value.get()?),
        OracleType::Number(_, _) | OracleType::Float(_) => {
            let text: String = value.get()?;
            parse_number(text)
        }
        OracleType::Raw(_) | OracleType::LongRaw | OracleType::BLOB => {
            Value::from_bytes(&value.get::<Vec<u8>>()?)
        }
        _ => Value::String(value.get()?),
    };

    Ok(decoded)
}

/// Narrows an Oracle NUMBER rendered as text to the tightest cell type.
fn parse_number(text: String) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        Value::Int(i)
    } else if let Ok(f) = text.parse::<f64>() {
        Value::Float(f)
    } else {
        Value::String(text)
    }
}
