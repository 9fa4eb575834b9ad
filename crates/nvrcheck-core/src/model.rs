// ── Domain types ──
//
// The connection target supplied on the command line, and the read-only
// device view pulled from an NVR session.

use std::net::IpAddr;

use secrecy::SecretString;

/// Stable identifier of a device's primary entity.
pub type LogicalId = u32;

/// Where to connect, as whom, and how many devices to expect.
///
/// Built once from the command line, immutable thereafter.
#[derive(Debug, Clone)]
pub struct ConnectionTarget {
    pub address: IpAddr,
    pub username: String,
    pub password: SecretString,
    /// Negative counts are accepted but can never be matched.
    pub expected_devices: i16,
}

impl ConnectionTarget {
    pub fn new(address: IpAddr) -> Self {
        Self {
            address,
            username: String::new(),
            password: SecretString::from(String::new()),
            expected_devices: 0,
        }
    }

    /// Whether a live device list of `count` entries satisfies the target.
    pub fn expects(&self, count: usize) -> bool {
        usize::try_from(self.expected_devices).is_ok_and(|expected| expected == count)
    }
}

/// A sub-entity of a device (camera head, sensor, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub logical_id: Option<LogicalId>,
}

/// A device attached to the NVR, as last reported by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
    pub connected: bool,
    pub entities: Vec<Entity>,
}

impl Device {
    /// The logical id of the device's first entity.
    pub fn logical_id(&self) -> Option<LogicalId> {
        self.entities.first().and_then(|e| e.logical_id)
    }
}

impl From<nvrcheck_api::Camera> for Device {
    fn from(camera: nvrcheck_api::Camera) -> Self {
        Self {
            id: camera.id,
            name: camera.name,
            connected: camera.connected,
            entities: camera
                .entities
                .into_iter()
                .map(|e| Entity {
                    logical_id: e.logical_id,
                })
                .collect(),
        }
    }
}
