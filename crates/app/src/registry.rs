//! Device registry — the authoritative in-memory map of device records.
//!
//! The registry is a service object injected into every caller; nothing in
//! the workspace touches device state except through its API. Internally the
//! outer [`RwLock`] guards only the key set, while each record sits behind
//! its own [`Mutex`]: mutations for one device serialize, mutations for
//! different devices proceed in parallel, and every read observes a record
//! either before or after a mutation — never mid-way through one.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::{Mutex, Notify, RwLock};

use telebridge_domain::device::{
    DeviceAnnouncement, DeviceRecord, DeviceStatus, RegistrySnapshot,
};
use telebridge_domain::error::{BridgeError, NotFoundError};
use telebridge_domain::telemetry::TelemetrySnapshot;

/// Authoritative map of device id → record.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<String, Arc<Mutex<DeviceRecord>>>>,
    dirty: Notify,
}

impl DeviceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, id: &str) -> Option<Arc<Mutex<DeviceRecord>>> {
        self.devices.read().await.get(id).cloned()
    }

    /// Create or fully replace the record for the announced device.
    ///
    /// Re-announcement resets the record: channel states back to all-false,
    /// telemetry history cleared. Repeating the same announcement is
    /// idempotent per call, but each call performs the reset.
    pub async fn upsert_discovery(&self, announcement: DeviceAnnouncement) {
        let record = DeviceRecord::discovered(announcement);
        let id = record.id.clone();
        self.devices
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(record)));
        self.mark_dirty();
    }

    /// Set a device's status. Returns false (leaving the registry
    /// untouched) when the id is unknown.
    pub async fn update_status(&self, id: &str, status: DeviceStatus) -> bool {
        let Some(slot) = self.slot(id).await else {
            return false;
        };
        slot.lock().await.set_status(status);
        self.mark_dirty();
        true
    }

    /// Record a telemetry snapshot: latest value, history append, and the
    /// optional channel-state overwrite as a single atomic mutation.
    /// Returns false (no-op) when the id is unknown.
    pub async fn record_telemetry(&self, id: &str, snapshot: TelemetrySnapshot) -> bool {
        let Some(slot) = self.slot(id).await else {
            return false;
        };
        {
            let mut record = slot.lock().await;
            if let Some(reported) = &snapshot.channel_states
                && reported.len() != record.channel_count
            {
                tracing::debug!(
                    device_id = %id,
                    reported = reported.len(),
                    expected = record.channel_count,
                    "reported channel states resized to match discovery"
                );
            }
            record.record_telemetry(snapshot);
        }
        self.mark_dirty();
        true
    }

    /// Set one channel's state. Returns false (no-op) when the id is
    /// unknown or the index is outside `[0, channel_count)`.
    pub async fn apply_channel_command(&self, id: &str, index: usize, state: bool) -> bool {
        let Some(slot) = self.slot(id).await else {
            return false;
        };
        let applied = slot.lock().await.apply_channel_command(index, state);
        if applied {
            self.mark_dirty();
        }
        applied
    }

    /// Defensive copy of one record.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] when no device with `id` exists.
    pub async fn get(&self, id: &str) -> Result<DeviceRecord, BridgeError> {
        match self.slot(id).await {
            Some(slot) => Ok(slot.lock().await.clone()),
            None => Err(NotFoundError { id: id.to_string() }.into()),
        }
    }

    /// Whether a record exists for `id` (case-sensitive exact match).
    pub async fn contains(&self, id: &str) -> bool {
        self.devices.read().await.contains_key(id)
    }

    /// Clone every record into an id-keyed map.
    ///
    /// Each record is copied under its own lock, so the snapshot never
    /// contains a half-applied mutation; the key set is the one observed at
    /// the start of the call.
    pub async fn snapshot(&self) -> RegistrySnapshot {
        let slots: Vec<_> = self.devices.read().await.values().cloned().collect();
        let mut snapshot = BTreeMap::new();
        for slot in slots {
            let record = slot.lock().await.clone();
            snapshot.insert(record.id.clone(), record);
        }
        snapshot
    }

    /// All records matching the status filter (`None` = everything).
    pub async fn list_by_status(&self, status: Option<DeviceStatus>) -> Vec<DeviceRecord> {
        self.snapshot()
            .await
            .into_values()
            .filter(|record| status.is_none_or(|wanted| record.status == wanted))
            .collect()
    }

    /// Replace the whole registry with a previously persisted snapshot.
    pub async fn restore(&self, snapshot: RegistrySnapshot) {
        let mut devices = self.devices.write().await;
        devices.clear();
        for (id, record) in snapshot {
            devices.insert(id, Arc::new(Mutex::new(record)));
        }
    }

    /// Wait until some mutation has marked the registry dirty.
    ///
    /// One pending mark is retained, so a mutation landing between
    /// checkpoints is never lost.
    pub async fn changed(&self) {
        self.dirty.notified().await;
    }

    fn mark_dirty(&self) {
        self.dirty.notify_one();
    }
}
