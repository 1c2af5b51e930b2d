//! Commands — outbound actions dispatched to devices over the bus.

use serde::{Deserialize, Serialize};

/// An action a client asks a device to perform.
///
/// Serialized with the wire vocabulary the devices understand, tagged on the
/// `action` field: `{"action": "toggleChannel", "channel": 1, "state": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum DeviceCommand {
    /// Switch one channel on or off. Locally deterministic, so the
    /// dispatcher may apply it optimistically before the device confirms.
    #[serde(rename = "toggleChannel")]
    ToggleChannel { channel: usize, state: bool },

    /// Change the telemetry reporting interval, in seconds.
    #[serde(rename = "set_interval")]
    SetInterval { interval: u64 },

    /// Ask the device to reboot.
    #[serde(rename = "reboot")]
    Reboot,
}

impl DeviceCommand {
    /// The wire name of this command's action.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::ToggleChannel { .. } => "toggleChannel",
            Self::SetInterval { .. } => "set_interval",
            Self::Reboot => "reboot",
        }
    }
}

/// The bus topic a device listens on for commands.
#[must_use]
pub fn command_topic(device_id: &str) -> String {
    format!("{device_id}/commands")
}
