//! Snapshot store port — durable save/load of the registry state.

use std::future::Future;

use telebridge_domain::device::RegistrySnapshot;
use telebridge_domain::error::BridgeError;

/// Persists whole-registry snapshots.
///
/// The store only ever receives an already-serialized-consistent snapshot;
/// it never reaches into live registry state. Saves must replace the stored
/// document atomically so a crash mid-write cannot corrupt the previous
/// checkpoint.
pub trait SnapshotStore {
    /// Durably write the snapshot, replacing any previous one.
    fn save(
        &self,
        snapshot: &RegistrySnapshot,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Read back the last saved snapshot, or `None` when none exists.
    fn load(&self) -> impl Future<Output = Result<Option<RegistrySnapshot>, BridgeError>> + Send;
}

impl<T: SnapshotStore + Send + Sync> SnapshotStore for std::sync::Arc<T> {
    fn save(
        &self,
        snapshot: &RegistrySnapshot,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).save(snapshot)
    }

    fn load(&self) -> impl Future<Output = Result<Option<RegistrySnapshot>, BridgeError>> + Send {
        (**self).load()
    }
}
