//! HTTP transport tests against a server on an ephemeral port.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};
use sqlsnap::db::DriverRegistry;
use sqlsnap::query::Dispatcher;
use sqlsnap::server::{build_router, AppState};
use tokio::net::TcpListener;

/// Starts the server in the background and returns its `/query` URL.
async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(Dispatcher::new(Arc::new(DriverRegistry::standard())));

    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    format!("http://{addr}/query")
}

#[tokio::test]
async fn test_sqlite_query_over_http() {
    let url = spawn_server().await;

    let resp = reqwest::Client::new()
        .post(&url)
        .json(&json!({
            "database": "sqlite",
            "query": "SELECT 1 AS n, 'x' AS s, NULL AS z",
            "config": {}
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Json = resp.json().await.unwrap();
    assert_eq!(body, json!({"columns": ["n", "s", "z"], "rows": [[1, "x", null]]}));
}

#[tokio::test]
async fn test_body_without_content_type_is_accepted() {
    let url = spawn_server().await;

    let resp = reqwest::Client::new()
        .post(&url)
        .body(r#"{"database": "sqlite", "query": "SELECT 2 AS n"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Json = resp.json().await.unwrap();
    assert_eq!(body["rows"], json!([[2]]));
}

#[tokio::test]
async fn test_unsupported_backend_is_bad_request() {
    let url = spawn_server().await;

    let resp = reqwest::Client::new()
        .post(&url)
        .json(&json!({"database": "mongodb", "query": "db.users.find()"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Json = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "Unsupported database type: mongodb"}));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let url = spawn_server().await;

    let resp = reqwest::Client::new()
        .post(&url)
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Json = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_connection_failure_is_server_error() {
    let url = spawn_server().await;

    let resp = reqwest::Client::new()
        .post(&url)
        .json(&json!({
            "database": "postgresql",
            "query": "SELECT 1",
            "config": {"host": "127.0.0.1", "port": 1, "user": "u", "password": "p", "dbname": "d"}
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Json = resp.json().await.unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to connect: "), "{error}");
}

#[tokio::test]
async fn test_query_failure_is_server_error() {
    let url = spawn_server().await;

    let resp = reqwest::Client::new()
        .post(&url)
        .json(&json!({"database": "sqlite", "query": "SELECT * FROM nowhere"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Json = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Query failed: "));
    assert!(body.get("columns").is_none());
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let url = spawn_server().await;

    let resp = reqwest::get(&url).await.unwrap();
    assert_eq!(resp.status(), 405);
}
