//! # telebridged — telebridge daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Restore the registry from the last checkpoint
//! - Start the MQTT bridge, ingest, and checkpoint tasks
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT) with a final checkpoint
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

use std::sync::Arc;

use tokio::sync::mpsc;

use telebridge_adapter_http_axum::state::AppState;
use telebridge_adapter_mqtt::MqttBridge;
use telebridge_adapter_storage_json::JsonSnapshotStore;
use telebridge_app::pipeline::{checkpoint, ingest};
use telebridge_app::registry::DeviceRegistry;
use telebridge_app::services::command_dispatcher::CommandDispatcher;
use telebridge_app::services::device_query::DeviceQuery;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    // Persistence
    let store = JsonSnapshotStore::new(config.storage.path.clone());
    let registry = Arc::new(DeviceRegistry::new());
    checkpoint::restore(&registry, &store).await;

    // Bus
    let (bridge, publisher) = MqttBridge::connect(config.mqtt.clone());
    let (events_tx, events_rx) = mpsc::channel(256);
    tokio::spawn(bridge.run(events_tx));

    // Pipeline tasks
    tokio::spawn(ingest::run(events_rx, Arc::clone(&registry)));
    tokio::spawn(checkpoint::run(
        Arc::clone(&registry),
        store.clone(),
        config.storage.checkpoint_debounce(),
    ));

    // HTTP
    let state = AppState::new(
        DeviceQuery::new(Arc::clone(&registry)),
        CommandDispatcher::new(Arc::clone(&registry), publisher),
    );
    let app = telebridge_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "telebridged listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Best-effort final checkpoint on the way out.
    if let Err(err) = checkpoint::save_now(&registry, &store).await {
        tracing::warn!(error = %err, "final checkpoint failed");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
