//! nickrelay - in-memory nickname chat relay.
//!
//! Clients connect over TCP, claim a unique nickname, list who is online,
//! and send direct or broadcast messages. All registry state lives in a
//! single actor task; connections talk to it only by message passing.

mod config;
mod error;
mod handlers;
mod http;
mod metrics;
mod network;
mod state;
mod telemetry;

use crate::config::Config;
use crate::network::Gateway;
use crate::state::RegistryHandle;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = load_config()?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    info!(
        server = %config.server.name,
        listen = %config.listen.address,
        "Starting nickrelay"
    );

    // Prometheus metrics are optional.
    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    match config.server.metrics_port {
        None | Some(0) => info!("Metrics disabled"),
        Some(port) => {
            metrics::init();
            let server = http::MetricsServer::bind(port).await?;
            tokio::spawn(server.run());
        }
    }

    let registry = RegistryHandle::spawn(config.limits.command_queue);
    info!(capacity = config.limits.command_queue, "Registry actor started");

    let gateway = Gateway::bind(config.listen.address, registry, config.limits.clone()).await?;

    tokio::select! {
        result = gateway.run() => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown requested, stopping");
        }
    }

    Ok(())
}

/// Load configuration from the path given as the first argument.
///
/// Without an argument, `config.toml` is used when present and built-in
/// defaults otherwise.
fn load_config() -> anyhow::Result<Config> {
    let (path, explicit) = match std::env::args().nth(1) {
        Some(path) => (path, true),
        None => (DEFAULT_CONFIG_PATH.to_string(), false),
    };

    if !explicit && !Path::new(&path).exists() {
        info!(path = %path, "No config file found, using defaults");
        return Ok(Config::default());
    }

    Config::load(&path).map_err(|e| {
        error!(path = %path, error = %e, "Failed to load config");
        anyhow::Error::from(e)
    })
}
