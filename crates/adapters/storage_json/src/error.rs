//! Storage-specific error type wrapping IO and serialization errors.

use telebridge_domain::error::BridgeError;

/// Errors originating from the JSON state file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading, writing, or replacing the state file failed.
    #[error("failed to access state file")]
    Io(#[from] std::io::Error),

    /// The registry snapshot could not be serialized.
    #[error("failed to serialize registry snapshot")]
    Serialize(#[source] serde_json::Error),

    /// The state file exists but does not parse as a registry snapshot.
    #[error("state file is corrupt")]
    Corrupt(#[source] serde_json::Error),
}

impl From<StorageError> for BridgeError {
    fn from(err: StorageError) -> Self {
        Self::Persistence(Box::new(err))
    }
}
