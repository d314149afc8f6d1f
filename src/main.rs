// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};

use crate::application::commands::CommandDispatcher;
use crate::application::coordinator::MinerSession;
use crate::infrastructure::axeos_client::{build_http_client, AxeOsClient};
use crate::infrastructure::config::load_app_config;
use crate::presentation::app_state::{AppState, MinerHandle};
use crate::presentation::handlers::{
    get_miner, health_check, list_miners, restart_miner, set_fanspeed, set_frequency, set_voltage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;
    anyhow::ensure!(!app_config.miners.is_empty(), "no miners configured");

    let http = build_http_client()?;

    // Bring up one session per configured miner. A miner whose first fetch
    // fails is reported and skipped; the rest keep running.
    let mut miners = HashMap::new();
    for miner in &app_config.miners {
        let api = Arc::new(AxeOsClient::new(http.clone(), &miner.host));
        let dispatcher = CommandDispatcher::new(api.clone());
        let name = miner.display_name().to_string();
        match MinerSession::start(name, api, miner.session_config()).await {
            Ok(session) => {
                miners.insert(miner.id(), MinerHandle { session, dispatcher });
            }
            Err(err) => {
                tracing::error!(host = %miner.host, "failed to initialize miner: {err}");
            }
        }
    }
    anyhow::ensure!(!miners.is_empty(), "no miner session could be started");

    let state = Arc::new(AppState { miners });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/miners", get(list_miners))
        .route("/miners/:id", get(get_miner))
        .route("/miners/:id/restart", post(restart_miner))
        .route("/miners/:id/frequency", post(set_frequency))
        .route("/miners/:id/voltage", post(set_voltage))
        .route("/miners/:id/fanspeed", post(set_fanspeed))
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config.listen_addr.parse()?;
    tracing::info!("starting axeos-telemetry service on {addr}");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
