//! Command publisher port — outbound bus hand-off.

use std::future::Future;

use telebridge_domain::error::BridgeError;

/// Publishes an encoded command payload onto the message bus.
///
/// Implementations must bound their wait: a stalled broker may fail the
/// hand-off (with [`BridgeError::Transport`]) but never block the caller
/// indefinitely. Delivery beyond the hand-off is fire-and-forget.
pub trait CommandPublisher {
    /// Hand the payload to the bus on the given topic.
    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: CommandPublisher + Send + Sync> CommandPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).publish(topic, payload)
    }
}
