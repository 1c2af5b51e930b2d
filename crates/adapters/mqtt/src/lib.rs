//! # telebridge-adapter-mqtt
//!
//! MQTT adapter — the bus-facing edge of the reconciliation engine.
//!
//! ## Responsibilities
//! - Connect to the MQTT broker and subscribe to the device topics
//!   (`global/discovery`, `+/status`, `+/telemetry`, `+/commands`)
//! - Classify and decode inbound messages ([`topic`]) into pipeline events
//! - Feed decoded events into the engine's single ingest channel
//! - Publish outbound commands with a bounded hand-off ([`publisher`])
//! - Survive broker outages: reconnect with capped exponential backoff,
//!   resubscribing on every new session, while the registry keeps serving
//!   last-known state
//!
//! ## Dependency rule
//! Depends on `telebridge-app` and `telebridge-domain` only.

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet};
use tokio::sync::mpsc;

use telebridge_domain::event::DeviceEvent;

pub mod config;
pub mod error;
pub mod publisher;
pub mod topic;

pub use config::MqttConfig;
pub use error::MqttError;
pub use publisher::MqttPublisher;

/// The broker-facing side of the engine.
pub struct MqttBridge {
    client: AsyncClient,
    eventloop: EventLoop,
    config: MqttConfig,
}

impl MqttBridge {
    /// Build the bridge and its publisher handle.
    ///
    /// No network IO happens here; the connection is established lazily by
    /// the event loop inside [`run`](Self::run).
    #[must_use]
    pub fn connect(config: MqttConfig) -> (Self, MqttPublisher) {
        let mut options = MqttOptions::new(
            config.unique_client_id(),
            &config.broker_host,
            config.broker_port,
        );
        options.set_keep_alive(std::time::Duration::from_secs(u64::from(
            config.keep_alive_secs,
        )));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        let (client, eventloop) = AsyncClient::new(options, 64);
        let publisher = MqttPublisher::new(client.clone(), config.publish_timeout());
        (
            Self {
                client,
                eventloop,
                config,
            },
            publisher,
        )
    }

    /// Drive the event loop until the engine's ingest channel closes.
    ///
    /// Decoded events are forwarded to `events`; malformed payloads are
    /// logged and dropped. Connection errors back off exponentially up to
    /// the configured ceiling, resetting once a connection is accepted.
    pub async fn run(mut self, events: mpsc::Sender<DeviceEvent>) {
        let mut backoff = self.config.reconnect_initial();
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    backoff = self.config.reconnect_initial();
                    tracing::info!(
                        host = %self.config.broker_host,
                        port = self.config.broker_port,
                        "connected to MQTT broker"
                    );
                    if let Err(err) = Self::subscribe(&self.client).await {
                        tracing::error!(error = %err, "failed to subscribe to device topics");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    if !forward(&events, &publish.topic, &publish.payload).await {
                        tracing::debug!("ingest channel closed, stopping MQTT bridge");
                        return;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        delay = ?backoff,
                        "MQTT connection error, backing off before reconnect"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(self.config.reconnect_max());
                }
            }
        }
    }

    async fn subscribe(client: &AsyncClient) -> Result<(), MqttError> {
        for pattern in [topic::DISCOVERY_TOPIC, "+/status", "+/telemetry", "+/commands"] {
            client
                .subscribe(pattern, rumqttc::QoS::AtLeastOnce)
                .await
                .map_err(MqttError::Client)?;
        }
        Ok(())
    }
}

/// Decode and forward one message; false means the receiver is gone.
async fn forward(events: &mpsc::Sender<DeviceEvent>, topic: &str, payload: &[u8]) -> bool {
    match topic::decode(topic, payload) {
        Ok(Some(event)) => events.send(event).await.is_ok(),
        Ok(None) => {
            tracing::trace!(topic = %topic, "ignoring unrecognized topic");
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "dropping malformed bus message");
            true
        }
    }
}
