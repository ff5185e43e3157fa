//! HTTP transport for the query proxy.
//!
//! ```text
//! POST /query   - run one query, respond with a QueryResult
//! ```

mod handlers;

use std::sync::Arc;

use axum::{routing::post, Router};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::query::Dispatcher;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// Builds the router. Methods other than POST on `/query` get 405.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/query", post(handlers::query))
        .with_state(state)
}

/// Serves requests on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(e) => {
            warn!("Cannot listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
