//! Request dispatch: lookup, connect, execute, close.
//!
//! Each request gets a fresh connector from the registry; nothing is shared
//! between requests except the registry itself.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::db::{DriverRegistry, QueryResult};
use crate::error::Result;
use crate::query::Pagination;

/// A single query request as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Backend identifier, e.g. `postgresql` or `redis`.
    #[serde(rename = "database", default)]
    pub backend: String,

    /// SQL text or a Redis command line.
    #[serde(default)]
    pub query: String,

    #[serde(rename = "config", default)]
    pub credentials: Credentials,

    #[serde(flatten)]
    pub page: Pagination,
}

/// Runs requests against connectors produced by a shared registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<DriverRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<DriverRegistry>) -> Self {
        Self { registry }
    }

    /// Executes a request, returning the first failure as a typed error.
    ///
    /// Close is attempted whenever connect succeeded, even if the query
    /// failed; close errors are logged and dropped.
    pub async fn dispatch(&self, request: &QueryRequest) -> Result<QueryResult> {
        let start = Instant::now();
        let mut connector = self.registry.create(&request.backend)?;

        debug!(
            "Connecting to {} at {}",
            request.backend,
            request.credentials.display_string()
        );
        connector.connect(&request.credentials).await?;

        let result = connector.execute_query(&request.query, &request.page).await;

        if let Err(e) = connector.close().await {
            warn!("Failed to close {} connection: {e}", request.backend);
        }

        let result = result?;
        info!(
            backend = %request.backend,
            rows = result.row_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Query completed"
        );
        Ok(result)
    }

    /// Executes a request, folding any error into [`QueryResult::error`].
    pub async fn execute(&self, request: &QueryRequest) -> QueryResult {
        match self.dispatch(request).await {
            Ok(result) => result,
            Err(e) => {
                debug!("Request for {} failed: {e}", request.backend);
                QueryResult::failed(e.to_string())
            }
        }
    }
}
