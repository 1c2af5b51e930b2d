//! Device — the reconciled view of one networked device.
//!
//! Records exist only after a discovery announcement. Re-announcing a known
//! id fully replaces the record (channel states reset to all-false, history
//! cleared): a re-announcement is a reset, not a partial merge.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::telemetry::{TelemetryHistory, TelemetrySnapshot};

/// Connectivity status as reported on the device's status topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

/// Payload of a `global/discovery` announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceAnnouncement {
    /// Stable device identifier; case-sensitive exact match, never reused.
    pub id: String,
    /// Opaque firmware version string.
    #[serde(default)]
    pub firmware: Option<String>,
    /// Feature names the device supports.
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    /// Number of switchable channels.
    #[serde(default)]
    pub channels: usize,
    /// Sensor name → opaque configuration.
    #[serde(default)]
    pub sensors: BTreeMap<String, serde_json::Value>,
}

/// Payload of a `<id>/status` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: DeviceStatus,
}

/// The authoritative record for one discovered device.
///
/// Invariant: `channel_states.len() == channel_count` after every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub id: String,
    #[serde(default)]
    pub firmware: Option<String>,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    pub channel_count: usize,
    pub channel_states: Vec<bool>,
    pub status: DeviceStatus,
    #[serde(default)]
    pub sensors: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub telemetry: Option<TelemetrySnapshot>,
    #[serde(default)]
    pub telemetry_history: TelemetryHistory,
}

impl DeviceRecord {
    /// Build a fresh record from a discovery announcement.
    ///
    /// Channel states start all-false, telemetry absent, history empty.
    /// A device announcing itself is treated as online (the announcement is
    /// proof of life).
    #[must_use]
    pub fn discovered(announcement: DeviceAnnouncement) -> Self {
        Self {
            id: announcement.id,
            firmware: announcement.firmware,
            capabilities: announcement.capabilities,
            channel_count: announcement.channels,
            channel_states: vec![false; announcement.channels],
            status: DeviceStatus::Online,
            sensors: announcement.sensors,
            telemetry: None,
            telemetry_history: TelemetryHistory::default(),
        }
    }

    /// Set the connectivity status.
    pub fn set_status(&mut self, status: DeviceStatus) {
        self.status = status;
    }

    /// Record a telemetry snapshot: latest value, history append, and — when
    /// the device reported them — a wholesale channel-state overwrite, as one
    /// mutation.
    ///
    /// A reported state vector is resized to `channel_count` (truncate or pad
    /// with false) so the length invariant holds even against a device whose
    /// announcement is stale.
    pub fn record_telemetry(&mut self, snapshot: TelemetrySnapshot) {
        if let Some(reported) = &snapshot.channel_states {
            let mut states = reported.clone();
            states.resize(self.channel_count, false);
            self.channel_states = states;
        }
        self.telemetry_history.push(snapshot.clone());
        self.telemetry = Some(snapshot);
    }

    /// Set one channel's state, returning false (without mutating) when
    /// `index` is outside `[0, channel_count)`.
    pub fn apply_channel_command(&mut self, index: usize, state: bool) -> bool {
        if index >= self.channel_count {
            return false;
        }
        self.channel_states[index] = state;
        true
    }
}

/// Wholesale projection of the registry: device id → record.
///
/// This is both the `GET /devices` response shape and the persisted state
/// layout.
pub type RegistrySnapshot = BTreeMap<String, DeviceRecord>;
