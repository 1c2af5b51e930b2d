//! Device query — the read-only façade polling clients hit.

use std::sync::Arc;

use telebridge_domain::device::{DeviceRecord, DeviceStatus, RegistrySnapshot};
use telebridge_domain::error::BridgeError;

use crate::registry::DeviceRegistry;

/// Read-only projection of the registry.
///
/// Pure delegation, no mutation, no side effects — safe for unbounded
/// concurrent callers.
pub struct DeviceQuery {
    registry: Arc<DeviceRegistry>,
}

impl DeviceQuery {
    /// Create a query façade over the registry.
    #[must_use]
    pub fn new(registry: Arc<DeviceRegistry>) -> Self {
        Self { registry }
    }

    /// The full registry keyed by device id, optionally filtered by status.
    pub async fn snapshot(&self, status: Option<DeviceStatus>) -> RegistrySnapshot {
        let mut snapshot = self.registry.snapshot().await;
        if let Some(wanted) = status {
            snapshot.retain(|_, record| record.status == wanted);
        }
        snapshot
    }

    /// One device record.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] when no device with `id` exists.
    pub async fn get(&self, id: &str) -> Result<DeviceRecord, BridgeError> {
        self.registry.get(id).await
    }
}
