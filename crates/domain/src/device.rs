//! Device: a controllable or sensing unit belonging to exactly one room.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HomeSimError, ValidationError};
use crate::id::{DeviceId, RoomId};

/// Fixed set of device kinds, each with its own [`DeviceProfile`](crate::profile::DeviceProfile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Light,
    Thermostat,
    Blind,
    Tv,
    Other,
}

impl DeviceType {
    /// Every device type, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Light,
        Self::Thermostat,
        Self::Blind,
        Self::Tv,
        Self::Other,
    ];

    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Thermostat => "thermostat",
            Self::Blind => "blind",
            Self::Tv => "tv",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownDeviceType(s.to_string()))
    }
}

/// A stored device. Devices are created once per room and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub room_id: RoomId,
    pub device_type: DeviceType,
    pub name: String,
}

/// A device that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTemplate {
    pub device_type: DeviceType,
    pub name: String,
}

impl DeviceTemplate {
    #[must_use]
    pub fn new(device_type: DeviceType, name: impl Into<String>) -> Self {
        Self {
            device_type,
            name: name.into(),
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomeSimError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), HomeSimError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Attach the keys assigned by the store.
    #[must_use]
    pub fn into_device(self, id: DeviceId, room_id: RoomId) -> Device {
        Device {
            id,
            room_id,
            device_type: self.device_type,
            name: self.name,
        }
    }
}

/// Devices installed in a freshly seeded room.
///
/// Every room gets two lights, a blind and a thermostat. Rooms whose key is
/// a multiple of 3 also get a TV, multiples of 2 an air purifier.
#[must_use]
pub fn layout_for(room_id: RoomId) -> Vec<DeviceTemplate> {
    let mut devices = vec![
        DeviceTemplate::new(DeviceType::Light, "Ceiling Light"),
        DeviceTemplate::new(DeviceType::Light, "Bedside Lamp"),
        DeviceTemplate::new(DeviceType::Blind, "Window Blind"),
        DeviceTemplate::new(DeviceType::Thermostat, "Room Thermostat"),
    ];
    if room_id.is_multiple_of(3) {
        devices.push(DeviceTemplate::new(DeviceType::Tv, "Smart TV"));
    }
    if room_id.is_multiple_of(2) {
        devices.push(DeviceTemplate::new(DeviceType::Other, "Air Purifier"));
    }
    devices
}
