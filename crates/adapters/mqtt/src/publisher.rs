//! Outbound command publisher over the shared MQTT client.

use std::time::Duration;

use rumqttc::{AsyncClient, QoS};

use telebridge_app::ports::CommandPublisher;
use telebridge_domain::error::BridgeError;

use crate::error::MqttError;

/// [`CommandPublisher`] backed by the bridge's MQTT client.
///
/// The hand-off is bounded: a stalled broker fails the publish with a
/// timeout instead of stalling command dispatch indefinitely.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
    timeout: Duration,
}

impl MqttPublisher {
    pub(crate) fn new(client: AsyncClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl CommandPublisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BridgeError> {
        let send = self.client.publish(topic, QoS::AtLeastOnce, false, payload);
        match tokio::time::timeout(self.timeout, send).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(MqttError::Client(err).into()),
            Err(_) => Err(MqttError::PublishTimeout(self.timeout).into()),
        }
    }
}
