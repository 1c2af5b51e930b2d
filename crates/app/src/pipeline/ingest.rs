//! Ingest task — applies decoded bus events to the registry.

use std::sync::Arc;

use tokio::sync::mpsc;

use telebridge_domain::command::DeviceCommand;
use telebridge_domain::event::DeviceEvent;

use crate::registry::DeviceRegistry;

/// Consume events until the channel closes, applying each to the registry.
///
/// This is the only writer driven by bus traffic; transports just decode
/// and send. Events for unknown device ids are dropped (logged at debug) —
/// only discovery creates records.
pub async fn run(mut events: mpsc::Receiver<DeviceEvent>, registry: Arc<DeviceRegistry>) {
    while let Some(event) = events.recv().await {
        apply(&registry, event).await;
    }
    tracing::debug!("event channel closed, ingest task stopping");
}

async fn apply(registry: &DeviceRegistry, event: DeviceEvent) {
    match event {
        DeviceEvent::Discovered(announcement) => {
            tracing::info!(
                device_id = %announcement.id,
                channels = announcement.channels,
                "device discovered"
            );
            registry.upsert_discovery(announcement).await;
        }
        DeviceEvent::StatusChanged { id, status } => {
            if registry.update_status(&id, status).await {
                tracing::info!(device_id = %id, ?status, "device status changed");
            } else {
                tracing::debug!(device_id = %id, "status for unknown device ignored");
            }
        }
        DeviceEvent::Telemetry { id, snapshot } => {
            if !registry.record_telemetry(&id, snapshot).await {
                tracing::debug!(device_id = %id, "telemetry for unknown device ignored");
            }
        }
        DeviceEvent::CommandEcho { id, command } => match command {
            DeviceCommand::ToggleChannel { channel, state } => {
                if !registry.apply_channel_command(&id, channel, state).await {
                    tracing::debug!(
                        device_id = %id,
                        channel,
                        "channel echo ignored (unknown device or channel)"
                    );
                }
            }
            other => {
                tracing::trace!(
                    device_id = %id,
                    action = other.action(),
                    "command echo carries no registry state"
                );
            }
        },
    }
}
