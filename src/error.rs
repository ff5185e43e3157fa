//! Error types for SQLSnap.
//!
//! Defines the main error enum used throughout the proxy.

use crate::commands::TokenizeError;
use thiserror::Error;

/// Main error type for SQLSnap operations.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The requested backend identifier is not registered.
    #[error("Unsupported database type: {0}")]
    UnsupportedBackend(String),

    /// Database connection errors (bad address, auth failed, unreachable host, etc.)
    #[error("Failed to connect: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, decode failures, etc.)
    #[error("Query failed: {0}")]
    Query(String),

    /// Key-value command line could not be tokenized.
    #[error("Query failed: {0}")]
    Tokenize(#[from] TokenizeError),

    /// Configuration errors (invalid config file, bad listen address, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors (worker thread panicked, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Creates an unsupported backend error for the given identifier.
    pub fn unsupported_backend(id: impl Into<String>) -> Self {
        Self::UnsupportedBackend(id.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnsupportedBackend(_) => "Unsupported Backend",
            Self::Connection(_) => "Connection Error",
            Self::Query(_) | Self::Tokenize(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns true if the request itself was at fault rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnsupportedBackend(_))
    }
}

/// Result type alias using ProxyError.
pub type Result<T> = std::result::Result<T, ProxyError>;
