//! Dispatcher lifecycle tests using the mock connector.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use sqlsnap::db::{ConnectorEvent, ConnectorLog, DriverRegistry, MockConnector};
use sqlsnap::error::ProxyError;
use sqlsnap::query::{Dispatcher, Pagination, QueryRequest};

fn mock_dispatcher(mock: MockConnector) -> Dispatcher {
    let registry = DriverRegistry::standard().with_factory("mock", move || Box::new(mock.clone()));
    Dispatcher::new(Arc::new(registry))
}

#[tokio::test]
async fn test_mock_backend_alongside_standard_backends() {
    let log = ConnectorLog::new();
    let dispatcher = mock_dispatcher(MockConnector::new(log.clone()));

    let request = QueryRequest {
        backend: "mock".to_string(),
        query: "SELECT * FROM t".to_string(),
        page: Pagination::new(Some(10), Some(20)),
        ..Default::default()
    };
    dispatcher.dispatch(&request).await.unwrap();

    assert_eq!(
        log.events(),
        vec![
            ConnectorEvent::Connect,
            ConnectorEvent::Execute("SELECT * FROM t LIMIT 10 OFFSET 20".to_string()),
            ConnectorEvent::Close,
        ]
    );
}

#[tokio::test]
async fn test_backend_ids_are_case_sensitive() {
    let log = ConnectorLog::new();
    let dispatcher = mock_dispatcher(MockConnector::new(log.clone()));

    let request = QueryRequest {
        backend: "MOCK".to_string(),
        query: "SELECT 1".to_string(),
        ..Default::default()
    };
    let err = dispatcher.dispatch(&request).await.unwrap_err();

    assert!(matches!(err, ProxyError::UnsupportedBackend(_)));
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let log = ConnectorLog::new();
    let dispatcher = Arc::new(mock_dispatcher(MockConnector::new(log.clone())));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let request = QueryRequest {
                    backend: "mock".to_string(),
                    query: format!("SELECT {i}"),
                    ..Default::default()
                };
                dispatcher.execute(&request).await
            })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(result.error.is_none());
        assert_eq!(result.rows.len(), 1);
    }

    let events = log.events();
    let count = |event: ConnectorEvent| events.iter().filter(|e| **e == event).count();
    assert_eq!(count(ConnectorEvent::Connect), 8);
    assert_eq!(count(ConnectorEvent::Close), 8);
}
