//! SQLite end-to-end tests through the standard registry.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use sqlsnap::config::Credentials;
use sqlsnap::db::{DriverRegistry, Value};
use sqlsnap::query::{Dispatcher, Pagination, QueryRequest};
use tempfile::TempDir;

fn sqlite_request(dir: &TempDir, query: &str) -> QueryRequest {
    QueryRequest {
        backend: "sqlite".to_string(),
        query: query.to_string(),
        credentials: Credentials {
            dbname: dir.path().join("app.db").to_string_lossy().into_owned(),
            ..Default::default()
        },
        page: Pagination::default(),
    }
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(DriverRegistry::standard()))
}

async fn seed(dispatcher: &Dispatcher, dir: &TempDir) {
    for sql in [
        "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT NOT NULL, price REAL)",
        "INSERT INTO items (name, price) VALUES ('apple', 1.25), ('pear', NULL), ('plum', 3.0), ('fig', 0.5)",
    ] {
        dispatcher.dispatch(&sqlite_request(dir, sql)).await.unwrap();
    }
}

#[tokio::test]
async fn test_each_request_opens_fresh_connection() {
    let dir = TempDir::new().unwrap();
    let dispatcher = dispatcher();
    seed(&dispatcher, &dir).await;

    let result = dispatcher
        .dispatch(&sqlite_request(&dir, "SELECT name, price FROM items ORDER BY id"))
        .await
        .unwrap();

    assert_eq!(result.columns, vec!["name", "price"]);
    assert_eq!(result.rows.len(), 4);
    assert_eq!(result.rows[1], vec![Value::from("pear"), Value::Null]);
    assert!(result.rows.iter().all(|row| row.len() == result.columns.len()));
}

#[tokio::test]
async fn test_paginated_request() {
    let dir = TempDir::new().unwrap();
    let dispatcher = dispatcher();
    seed(&dispatcher, &dir).await;

    let mut request = sqlite_request(&dir, "SELECT id FROM items ORDER BY id;");
    request.page = Pagination::new(Some(2), Some(1));

    let result = dispatcher.dispatch(&request).await.unwrap();
    assert_eq!(result.rows, vec![vec![Value::Int(2)], vec![Value::Int(3)]]);
}

#[tokio::test]
async fn test_existing_limit_wins_over_request_pagination() {
    let dir = TempDir::new().unwrap();
    let dispatcher = dispatcher();
    seed(&dispatcher, &dir).await;

    let mut request = sqlite_request(&dir, "SELECT id FROM items ORDER BY id LIMIT 1");
    request.page = Pagination::new(Some(3), Some(0));

    let result = dispatcher.dispatch(&request).await.unwrap();
    assert_eq!(result.rows, vec![vec![Value::Int(1)]]);
}

#[tokio::test]
async fn test_query_error_is_folded_into_result() {
    let dir = TempDir::new().unwrap();
    let result = dispatcher()
        .execute(&sqlite_request(&dir, "SELEC oops"))
        .await;

    let error = result.error.expect("error should be set");
    assert!(error.starts_with("Query failed: "), "{error}");
    assert!(result.columns.is_empty());
    assert!(result.rows.is_empty());
}
