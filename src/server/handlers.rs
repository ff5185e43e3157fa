//! HTTP handlers for the query endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use crate::db::QueryResult;
use crate::error::ProxyError;
use crate::query::QueryRequest;

use super::AppState;

/// `POST /query`
///
/// The body is decoded by hand so that clients which omit the JSON
/// content type are still served.
pub async fn query(State(state): State<AppState>, body: Bytes) -> Response {
    let request: QueryRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!("Rejected malformed request body: {e}");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match state.dispatcher.dispatch(&request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => e.into_response(),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(QueryResult::failed(message))).into_response()
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        warn!(category = self.category(), "{self}");
        error_response(status, self.to_string())
    }
}
