//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! at the port boundary. No variant is ever fatal to the process: decode
//! failures drop the offending message, persistence failures are retried on
//! the next checkpoint, transport failures trigger reconnection.

/// Base error enum shared across all layers.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A malformed inbound payload.
    #[error("decode error")]
    Decode(#[from] DecodeError),

    /// An operation referenced an unknown device id.
    #[error("device not found")]
    NotFound(#[from] NotFoundError),

    /// The storage layer failed to save or load a snapshot.
    #[error("persistence error")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The message bus is unreachable or refused a hand-off.
    #[error("bus transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A payload that could not be decoded into a known event shape.
#[derive(Debug, thiserror::Error)]
#[error("malformed payload on topic `{topic}`")]
pub struct DecodeError {
    /// Topic the payload arrived on.
    pub topic: String,
    /// Underlying JSON error.
    #[source]
    pub source: serde_json::Error,
}

/// An operation referenced a device id absent from the registry.
#[derive(Debug, thiserror::Error)]
#[error("unknown device `{id}`")]
pub struct NotFoundError {
    /// The device id that was looked up.
    pub id: String,
}
