//! MQTT adapter error types.

use std::time::Duration;

use telebridge_domain::error::BridgeError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// The bus did not accept a publish hand-off in time.
    #[error("publish not accepted by the bus within {0:?}")]
    PublishTimeout(Duration),
}

impl From<MqttError> for BridgeError {
    fn from(err: MqttError) -> Self {
        Self::Transport(Box::new(err))
    }
}
