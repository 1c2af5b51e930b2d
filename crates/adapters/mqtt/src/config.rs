//! MQTT bridge configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the MQTT bridge.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier prefix; a random suffix is appended per
    /// connection so parallel instances never collide on the broker.
    pub client_id: String,
    /// Broker username, if the broker requires authentication.
    pub username: Option<String>,
    /// Broker password.
    pub password: Option<String>,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// How long a command publish may wait for the bus hand-off, in seconds.
    pub publish_timeout_secs: u16,
    /// First reconnect delay after a connection error, in milliseconds.
    pub reconnect_initial_ms: u64,
    /// Reconnect delay ceiling, in seconds.
    pub reconnect_max_secs: u16,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "telebridge".to_string(),
            username: None,
            password: None,
            keep_alive_secs: 30,
            publish_timeout_secs: 5,
            reconnect_initial_ms: 500,
            reconnect_max_secs: 30,
        }
    }
}

impl MqttConfig {
    /// Client id with a unique per-connection suffix.
    #[must_use]
    pub fn unique_client_id(&self) -> String {
        format!("{}-{}", self.client_id, uuid::Uuid::new_v4().simple())
    }

    /// Publish hand-off timeout.
    #[must_use]
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.publish_timeout_secs))
    }

    /// Initial reconnect backoff delay.
    #[must_use]
    pub fn reconnect_initial(&self) -> Duration {
        Duration::from_millis(self.reconnect_initial_ms)
    }

    /// Reconnect backoff ceiling.
    #[must_use]
    pub fn reconnect_max(&self) -> Duration {
        Duration::from_secs(u64::from(self.reconnect_max_secs))
    }
}
