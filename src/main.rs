//! SQLSnap - a stateless HTTP query proxy for SQL databases and Redis.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use cli::Cli;
use sqlsnap::config::Config;
use sqlsnap::db::DriverRegistry;
use sqlsnap::logging;
use sqlsnap::query::Dispatcher;
use sqlsnap::server::{self, AppState};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let server_config = cli.resolve_server(&config);
    let addr = server_config.socket_addr()?;

    let registry = Arc::new(DriverRegistry::standard());
    info!("Registered backends: {}", registry.backends().join(", "));
    let state = AppState::new(Dispatcher::new(registry));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Starting SQLSnap backend server on {addr}");
    server::serve(listener, state).await.context("server error")?;

    info!("Server stopped");
    Ok(())
}
