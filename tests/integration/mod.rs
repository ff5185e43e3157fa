//! Integration tests for SQLSnap.

pub mod connection_test;
pub mod dispatch_test;
pub mod server_test;
pub mod sqlite_test;
