//! # telebridge-adapter-storage-json
//!
//! Storage adapter — persists the registry as one JSON document mirroring
//! the in-memory map (device id → record).
//!
//! Saves never overwrite in place: the snapshot is written to a sibling
//! temporary file and renamed over the previous checkpoint, so a crash
//! mid-write leaves the old state intact.
//!
//! ## Dependency rule
//! Depends on `telebridge-app` (for the port trait) and `telebridge-domain`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use telebridge_app::ports::SnapshotStore;
use telebridge_domain::device::RegistrySnapshot;
use telebridge_domain::error::BridgeError;

pub mod error;

pub use error::StorageError;

/// [`SnapshotStore`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Create a store over the given state file path. The file (and its
    /// parent directory) need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The state file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotStore for JsonSnapshotStore {
    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), BridgeError> {
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(StorageError::Serialize)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::Io)?;
        }

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(StorageError::Io)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(StorageError::Io)?;

        tracing::trace!(path = %self.path.display(), bytes = bytes.len(), "state file replaced");
        Ok(())
    }

    async fn load(&self) -> Result<Option<RegistrySnapshot>, BridgeError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::Io(err).into()),
        };
        let snapshot = serde_json::from_slice(&bytes).map_err(StorageError::Corrupt)?;
        Ok(Some(snapshot))
    }
}
