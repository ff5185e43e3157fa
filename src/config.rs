//! Configuration management for SQLSnap.
//!
//! Handles the server's TOML configuration file and the per-request
//! backend credentials carried in each query.

use crate::error::{ProxyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default port the proxy listens on.
pub const DEFAULT_PORT: u16 = 9091;

/// Main configuration structure for SQLSnap.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Resolves the socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| ProxyError::config(format!("Invalid listen address '{addr}': {e}")))
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sqlsnap")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file is not an error and yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ProxyError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ProxyError::config(format!(
                "Invalid config file {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}

/// Backend credentials supplied with each query.
///
/// Fields are passed through verbatim to the backend's address encoding;
/// absent fields default to empty strings and port 0.
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Credentials {
    /// Database host.
    pub host: String,

    /// Database port.
    pub port: u16,

    /// Database user.
    pub user: String,

    /// Database password.
    pub password: String,

    /// Database name, or file path for SQLite.
    pub dbname: String,
}

impl Credentials {
    /// Returns `host:port`.
    pub fn host_port(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns a display-safe string (no password) for logging.
    pub fn display_string(&self) -> String {
        format!("{}@{}/{}", self.user, self.host_port(), self.dbname)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}
