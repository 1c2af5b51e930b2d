//! Command dispatcher — validates and routes outbound device commands.

use std::sync::Arc;

use telebridge_domain::command::{DeviceCommand, command_topic};
use telebridge_domain::error::{BridgeError, NotFoundError};

use crate::ports::CommandPublisher;
use crate::registry::DeviceRegistry;

/// Aggregate result of a bulk dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkDispatchOutcome {
    /// Commands handed to the bus.
    pub dispatched: usize,
    /// Targets that failed (unknown id or bus hand-off failure).
    pub failed: usize,
}

/// Routes commands from clients to devices via the bus.
///
/// Dispatch is fire-and-forget past the bus hand-off: the device's own
/// telemetry or command echo later confirms (and, being authoritative,
/// overwrites) whatever was applied optimistically here.
pub struct CommandDispatcher<P> {
    registry: Arc<DeviceRegistry>,
    publisher: P,
}

impl<P: CommandPublisher> CommandDispatcher<P> {
    /// Create a dispatcher over the given registry and bus publisher.
    pub fn new(registry: Arc<DeviceRegistry>, publisher: P) -> Self {
        Self {
            registry,
            publisher,
        }
    }

    /// Publish `command` to the device's command topic.
    ///
    /// Channel toggles are applied to the registry optimistically before the
    /// hand-off so polling clients see the new state immediately; an
    /// out-of-range channel leaves local state untouched but the command is
    /// still forwarded (the device is the judge of its own channels).
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id, or
    /// [`BridgeError::Transport`] when the bus refuses the hand-off.
    #[tracing::instrument(skip(self, command), fields(action = command.action()))]
    pub async fn dispatch(&self, id: &str, command: DeviceCommand) -> Result<(), BridgeError> {
        if !self.registry.contains(id).await {
            tracing::debug!(device_id = %id, "dispatch to unknown device");
            return Err(NotFoundError { id: id.to_string() }.into());
        }

        if let DeviceCommand::ToggleChannel { channel, state } = command {
            self.registry.apply_channel_command(id, channel, state).await;
        }

        let payload =
            serde_json::to_vec(&command).map_err(|err| BridgeError::Transport(Box::new(err)))?;
        self.publisher.publish(&command_topic(id), payload).await
    }

    /// Dispatch one command to many devices, reporting only aggregate
    /// counts. A failing target never aborts dispatch to the rest.
    #[tracing::instrument(skip(self, ids, command), fields(action = command.action(), targets = ids.len()))]
    pub async fn dispatch_bulk(
        &self,
        ids: &[String],
        command: DeviceCommand,
    ) -> BulkDispatchOutcome {
        let mut outcome = BulkDispatchOutcome::default();
        for id in ids {
            match self.dispatch(id, command.clone()).await {
                Ok(()) => outcome.dispatched += 1,
                Err(err) => {
                    tracing::debug!(device_id = %id, error = %err, "bulk dispatch target failed");
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }
}
