//! Topic router — classifies inbound bus messages and decodes payloads.

use serde::de::DeserializeOwned;

use telebridge_domain::command::DeviceCommand;
use telebridge_domain::device::{DeviceAnnouncement, StatusUpdate};
use telebridge_domain::error::DecodeError;
use telebridge_domain::event::DeviceEvent;
use telebridge_domain::telemetry::TelemetrySnapshot;

/// Topic all devices announce themselves on.
pub const DISCOVERY_TOPIC: &str = "global/discovery";

/// Classification of an inbound topic string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutedTopic<'a> {
    /// `global/discovery` (exact match).
    Discovery,
    /// `<id>/status`.
    Status(&'a str),
    /// `<id>/telemetry`.
    Telemetry(&'a str),
    /// `<id>/commands`, seen when the bus reflects applied commands.
    CommandEcho(&'a str),
    /// Anything else; ignored, not an error.
    Unrecognized,
}

/// Classify a topic. The device id is the prefix before the first `/`.
#[must_use]
pub fn route(topic: &str) -> RoutedTopic<'_> {
    if topic == DISCOVERY_TOPIC {
        return RoutedTopic::Discovery;
    }
    if let Some(id) = device_prefix(topic, "/status") {
        return RoutedTopic::Status(id);
    }
    if let Some(id) = device_prefix(topic, "/telemetry") {
        return RoutedTopic::Telemetry(id);
    }
    if let Some(id) = device_prefix(topic, "/commands") {
        return RoutedTopic::CommandEcho(id);
    }
    RoutedTopic::Unrecognized
}

fn device_prefix<'a>(topic: &'a str, suffix: &str) -> Option<&'a str> {
    let stem = topic.strip_suffix(suffix)?;
    let id = stem.split('/').next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}

/// Decode one `(topic, payload)` pair into a pipeline event.
///
/// Returns `Ok(None)` for unrecognized topics. A recognized topic with a
/// malformed payload fails with [`DecodeError`]; the caller logs and drops
/// the message.
///
/// # Errors
///
/// Returns [`DecodeError`] when the payload is not valid JSON of the shape
/// the topic implies.
pub fn decode(topic: &str, payload: &[u8]) -> Result<Option<DeviceEvent>, DecodeError> {
    let event = match route(topic) {
        RoutedTopic::Discovery => DeviceEvent::Discovered(parse(topic, payload)?),
        RoutedTopic::Status(id) => {
            let update: StatusUpdate = parse(topic, payload)?;
            DeviceEvent::StatusChanged {
                id: id.to_string(),
                status: update.status,
            }
        }
        RoutedTopic::Telemetry(id) => {
            let snapshot: TelemetrySnapshot = parse(topic, payload)?;
            DeviceEvent::Telemetry {
                id: id.to_string(),
                snapshot,
            }
        }
        RoutedTopic::CommandEcho(id) => {
            let command: DeviceCommand = parse(topic, payload)?;
            DeviceEvent::CommandEcho {
                id: id.to_string(),
                command,
            }
        }
        RoutedTopic::Unrecognized => return Ok(None),
    };
    Ok(Some(event))
}

fn parse<T: DeserializeOwned>(topic: &str, payload: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(payload).map_err(|source| DecodeError {
        topic: topic.to_string(),
        source,
    })
}
