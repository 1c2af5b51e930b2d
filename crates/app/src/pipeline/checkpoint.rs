//! Checkpoint task — debounced, best-effort durability for the registry.

use std::sync::Arc;
use std::time::Duration;

use telebridge_domain::error::BridgeError;

use crate::ports::SnapshotStore;
use crate::registry::DeviceRegistry;

/// Load the last checkpoint into the registry, or start empty.
///
/// Neither a missing nor an unreadable checkpoint prevents startup: state
/// persistence is layered under the live system, not a precondition for it.
pub async fn restore<S: SnapshotStore>(registry: &DeviceRegistry, store: &S) {
    match store.load().await {
        Ok(Some(snapshot)) => {
            let devices = snapshot.len();
            registry.restore(snapshot).await;
            tracing::info!(devices, "registry restored from checkpoint");
        }
        Ok(None) => {
            tracing::info!("no previous checkpoint, starting with an empty registry");
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                "checkpoint unreadable, starting with an empty registry"
            );
        }
    }
}

/// Persist the registry whenever it changes, debounced.
///
/// Waits for a dirty mark, sleeps `debounce` to coalesce bursts, then
/// serializes a point-in-time snapshot and hands it to the store — no
/// registry lock is held during the write. Save failures are logged and
/// retried on the next change, never escalated.
pub async fn run<S: SnapshotStore>(registry: Arc<DeviceRegistry>, store: S, debounce: Duration) {
    loop {
        registry.changed().await;
        tokio::time::sleep(debounce).await;
        save_once(&registry, &store).await;
    }
}

async fn save_once<S: SnapshotStore>(registry: &DeviceRegistry, store: &S) {
    let snapshot = registry.snapshot().await;
    match store.save(&snapshot).await {
        Ok(()) => {
            tracing::debug!(devices = snapshot.len(), "checkpoint saved");
        }
        Err(err) => {
            tracing::warn!(error = %err, "checkpoint save failed, will retry on next change");
        }
    }
}

/// Best-effort final checkpoint, used on graceful shutdown.
pub async fn save_now<S: SnapshotStore>(
    registry: &DeviceRegistry,
    store: &S,
) -> Result<(), BridgeError> {
    let snapshot = registry.snapshot().await;
    store.save(&snapshot).await
}
