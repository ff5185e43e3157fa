//! SQLSnap - a stateless HTTP query proxy for SQL databases and Redis.
//!
//! This library exposes the core modules for use by the binary and
//! integration tests.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod query;
pub mod server;
