//! Live backend tests.
//!
//! Each test is skipped unless its environment variable holds a URL for a
//! running server, e.g. `SQLSNAP_TEST_POSTGRES=postgres://u:p@localhost/db`.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use sqlsnap::config::Credentials;
use sqlsnap::db::{DriverRegistry, Value};
use sqlsnap::query::{Dispatcher, QueryRequest};

/// Builds credentials from the URL in `var`.
fn credentials_from_env(var: &str, default_port: u16) -> Option<Credentials> {
    let url = std::env::var(var).ok()?;
    let url = url::Url::parse(&url).ok()?;
    Some(Credentials {
        host: url.host_str()?.to_string(),
        port: url.port().unwrap_or(default_port),
        user: url.username().to_string(),
        password: url.password().unwrap_or_default().to_string(),
        dbname: url.path().trim_start_matches('/').to_string(),
    })
}

fn request(backend: &str, query: &str, credentials: Credentials) -> QueryRequest {
    QueryRequest {
        backend: backend.to_string(),
        query: query.to_string(),
        credentials,
        ..Default::default()
    }
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(DriverRegistry::standard()))
}

#[tokio::test]
async fn test_postgres_round_trip() {
    let Some(creds) = credentials_from_env("SQLSNAP_TEST_POSTGRES", 5432) else {
        eprintln!("Skipping test: SQLSNAP_TEST_POSTGRES not set");
        return;
    };

    let result = dispatcher()
        .dispatch(&request(
            "postgresql",
            "SELECT 42::int8 AS answer, 'x'::text AS label",
            creds,
        ))
        .await
        .unwrap();

    assert_eq!(result.columns, vec!["answer", "label"]);
    assert_eq!(result.rows, vec![vec![Value::Int(42), Value::from("x")]]);
}

#[tokio::test]
async fn test_postgres_bad_password() {
    let Some(mut creds) = credentials_from_env("SQLSNAP_TEST_POSTGRES", 5432) else {
        eprintln!("Skipping test: SQLSNAP_TEST_POSTGRES not set");
        return;
    };
    creds.password = "definitely-wrong-password".to_string();

    let result = dispatcher()
        .execute(&request("postgresql", "SELECT 1", creds))
        .await;
    let error = result.error.unwrap_or_default();
    assert!(error.starts_with("Failed to connect: "), "{error}");
}

#[tokio::test]
async fn test_mysql_round_trip() {
    let Some(creds) = credentials_from_env("SQLSNAP_TEST_MYSQL", 3306) else {
        eprintln!("Skipping test: SQLSNAP_TEST_MYSQL not set");
        return;
    };

    let result = dispatcher()
        .dispatch(&request("mysql", "SELECT 7 AS n, NULL AS z", creds))
        .await
        .unwrap();

    assert_eq!(result.columns, vec!["n", "z"]);
    assert_eq!(result.rows, vec![vec![Value::Int(7), Value::Null]]);
}

#[tokio::test]
async fn test_redis_hash_round_trip() {
    let Some(creds) = credentials_from_env("SQLSNAP_TEST_REDIS", 6379) else {
        eprintln!("Skipping test: SQLSNAP_TEST_REDIS not set");
        return;
    };
    let dispatcher = dispatcher();

    dispatcher
        .dispatch(&request("redis", "DEL sqlsnap:hash", creds.clone()))
        .await
        .unwrap();
    dispatcher
        .dispatch(&request(
            "redis",
            "HSET sqlsnap:hash name 'Jane Doe' role admin",
            creds.clone(),
        ))
        .await
        .unwrap();

    let result = dispatcher
        .dispatch(&request("redis", "HGETALL sqlsnap:hash", creds))
        .await
        .unwrap();

    assert_eq!(result.columns, vec!["key", "value"]);
    let mut rows = result.rows;
    rows.sort_by_key(|row| format!("{row:?}"));
    assert_eq!(
        rows,
        vec![
            vec![Value::from("name"), Value::from("Jane Doe")],
            vec![Value::from("role"), Value::from("admin")],
        ]
    );
}

#[tokio::test]
async fn test_redis_unreachable_is_query_error() {
    let creds = Credentials {
        host: "127.0.0.1".to_string(),
        port: 1,
        ..Default::default()
    };

    let result = dispatcher()
        .execute(&request("redis", "PING", creds))
        .await;
    let error = result.error.unwrap_or_default();
    assert!(error.starts_with("Query failed: "), "{error}");
}
