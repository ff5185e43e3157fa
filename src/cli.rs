//! Command-line argument parsing for SQLSnap.

use clap::Parser;
use sqlsnap::config::{Config, ServerConfig};
use std::path::PathBuf;

/// A stateless HTTP query proxy for SQL databases and Redis.
#[derive(Parser, Debug)]
#[command(name = "sqlsnap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, value_name = "HOST", env = "SQLSNAP_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long, value_name = "PORT", env = "SQLSNAP_PORT")]
    pub port: Option<u16>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Merges listener settings: arguments override the config file.
    pub fn resolve_server(&self, config: &Config) -> ServerConfig {
        let mut server = config.server.clone();
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
        server
    }
}
