//! Telemetry — sensor snapshots and the bounded per-device history ring.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A single typed measurement value.
///
/// The protocol only carries numeric and boolean readings; anything else in a
/// telemetry payload is a decode failure, not a silently-coerced value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

/// A point-in-time telemetry report from one device.
///
/// Measurements are kept under their wire names (`temperature`, `battery`,
/// `humidity`, …) and serialize flattened, so the JSON shape matches what the
/// device published plus the ingest timestamp. Devices may optionally report
/// the actual state of their channels; when present it overwrites the
/// record's channel states wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Measurement name → value, every field the device reported.
    #[serde(flatten)]
    pub readings: BTreeMap<String, MetricValue>,
    /// Device-reported channel states, authoritative when present.
    #[serde(
        rename = "channelStates",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub channel_states: Option<Vec<bool>>,
    /// When the snapshot was ingested. Devices do not send this; it defaults
    /// to the server clock at decode time.
    #[serde(default = "crate::time::now")]
    pub timestamp: Timestamp,
}

impl TelemetrySnapshot {
    /// Look up a single reading by its wire name.
    #[must_use]
    pub fn reading(&self, name: &str) -> Option<&MetricValue> {
        self.readings.get(name)
    }
}

/// Insertion-ordered ring of the most recent telemetry snapshots.
///
/// Bounded at [`TelemetryHistory::CAPACITY`] entries; pushing at capacity
/// evicts the oldest snapshot (strict FIFO). Serializes as a plain JSON
/// array, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TelemetryHistory {
    entries: VecDeque<TelemetrySnapshot>,
}

impl TelemetryHistory {
    /// Maximum number of retained snapshots per device.
    pub const CAPACITY: usize = 10;

    /// Append a snapshot, evicting the oldest entry at capacity.
    pub fn push(&mut self, snapshot: TelemetrySnapshot) {
        if self.entries.len() == Self::CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ring holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recently pushed snapshot.
    #[must_use]
    pub fn latest(&self) -> Option<&TelemetrySnapshot> {
        self.entries.back()
    }

    /// Iterate snapshots oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TelemetrySnapshot> {
        self.entries.iter()
    }

    /// Drop all retained snapshots.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'de> Deserialize<'de> for TelemetryHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // A hand-edited state file could exceed the bound; keep the newest.
        let mut entries = VecDeque::<TelemetrySnapshot>::deserialize(deserializer)?;
        while entries.len() > Self::CAPACITY {
            entries.pop_front();
        }
        Ok(Self { entries })
    }
}
