//! Events — decoded bus messages flowing through the ingest pipeline.

use crate::command::DeviceCommand;
use crate::device::{DeviceAnnouncement, DeviceStatus};
use crate::telemetry::TelemetrySnapshot;

/// One decoded inbound bus message.
///
/// The topic router produces these; a single mutation task consumes them and
/// applies them to the registry. Delivery order is only guaranteed per
/// device, so consumers must tolerate, e.g., a command echo arriving before
/// the telemetry it reconciles against.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// A device announced itself on `global/discovery`.
    Discovered(DeviceAnnouncement),
    /// A device's connectivity status changed.
    StatusChanged { id: String, status: DeviceStatus },
    /// A device published a telemetry snapshot.
    Telemetry {
        id: String,
        snapshot: TelemetrySnapshot,
    },
    /// The bus reflected a command applied by a device.
    CommandEcho { id: String, command: DeviceCommand },
}

impl DeviceEvent {
    /// The device this event targets.
    #[must_use]
    pub fn device_id(&self) -> &str {
        match self {
            Self::Discovered(announcement) => &announcement.id,
            Self::StatusChanged { id, .. }
            | Self::Telemetry { id, .. }
            | Self::CommandEcho { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn should_expose_device_id_for_each_variant() {
        let discovered = DeviceEvent::Discovered(DeviceAnnouncement {
            id: "d1".to_string(),
            firmware: None,
            capabilities: BTreeSet::new(),
            channels: 0,
            sensors: BTreeMap::new(),
        });
        assert_eq!(discovered.device_id(), "d1");

        let status = DeviceEvent::StatusChanged {
            id: "d2".to_string(),
            status: DeviceStatus::Offline,
        };
        assert_eq!(status.device_id(), "d2");

        let echo = DeviceEvent::CommandEcho {
            id: "d3".to_string(),
            command: DeviceCommand::Reboot,
        };
        assert_eq!(echo.device_id(), "d3");
    }
}
