//! Execution logic shared by the sqlx-backed relational connectors.
//!
//! Each driver prepares the statement to read column names, then streams
//! rows through [`collect_rows`] with its own cell decoder.

use crate::config::Credentials;
use crate::db::{QueryResult, Row, Value};
use crate::error::{ProxyError, Result};
use crate::query::{paginate, Pagination, PaginationStyle};
use futures::{Stream, TryStreamExt};
use std::borrow::Cow;
use tracing::debug;

/// Decodes one cell of a driver-native row.
pub(crate) trait DecodeCell: sqlx::Database {
    fn decode_cell(row: &Self::Row, index: usize) -> std::result::Result<Value, sqlx::Error>;
}

/// Returns the SQL to run: rewritten when pagination was requested,
/// verbatim otherwise.
pub(crate) fn effective_sql<'a>(
    query: &'a str,
    page: &Pagination,
    style: PaginationStyle,
) -> Cow<'a, str> {
    if page.is_requested() {
        Cow::Owned(paginate(query, page, style))
    } else {
        Cow::Borrowed(query)
    }
}

/// Extracts column names from statement metadata.
pub(crate) fn column_names<C: sqlx::Column>(columns: &[C]) -> Vec<String> {
    columns.iter().map(|c| c.name().to_string()).collect()
}

/// Drains a row stream into a result table.
///
/// An error before the first row is an execution failure; later errors are
/// iteration failures. Any failure discards the rows read so far.
pub(crate) async fn collect_rows<DB, S>(columns: Vec<String>, mut rows: S) -> Result<QueryResult>
where
    DB: DecodeCell,
    S: Stream<Item = std::result::Result<DB::Row, sqlx::Error>> + Unpin + Send,
{
    let mut data: Vec<Row> = Vec::new();

    loop {
        let next = rows.try_next().await.map_err(|e| {
            if data.is_empty() {
                ProxyError::query(format_query_error(e))
            } else {
                ProxyError::query(format!("Error reading rows: {e}"))
            }
        })?;

        let Some(row) = next else { break };

        let cells = (0..columns.len())
            .map(|i| DB::decode_cell(&row, i))
            .collect::<std::result::Result<Row, _>>()
            .map_err(|e| ProxyError::query(format!("Failed to scan row: {e}")))?;

        data.push(cells);
    }

    debug!("Materialized {} rows across {} columns", data.len(), columns.len());
    Ok(QueryResult::with_data(columns, data))
}

/// Formats a query error, adding PostgreSQL detail and hint when present.
pub(crate) fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = String::from("ERROR: ");
    result.push_str(db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }
        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }
    }

    result
}

/// Maps sqlx connection errors to user-friendly messages.
pub(crate) fn map_connection_error(error: sqlx::Error, credentials: &Credentials) -> ProxyError {
    let error_str = error.to_string().to_lowercase();
    let target = credentials.host_port();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        ProxyError::connection(format!(
            "Cannot connect to {target}. Check that the server is running."
        ))
    } else if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
        || error_str.contains("access denied")
    {
        ProxyError::connection(format!(
            "Authentication failed for user '{}'. Check your credentials.",
            credentials.user
        ))
    } else if error_str.contains("does not exist") && error_str.contains("database") {
        ProxyError::connection(format!(
            "Database '{}' does not exist.",
            credentials.dbname
        ))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        ProxyError::connection(format!(
            "Connection to {target} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        ProxyError::connection(error.to_string())
    }
}
