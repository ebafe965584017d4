//! Device profiles: per-type energy range and status-change probability.

use crate::device::DeviceType;

/// Fixed simulation parameters of a [`DeviceType`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceProfile {
    /// Lowest hourly draw in kWh.
    pub min_energy: f64,
    /// Highest hourly draw in kWh.
    pub max_energy: f64,
    /// Chance that a status pass flips the device.
    pub status_change_probability: f64,
}

const LIGHT: DeviceProfile = DeviceProfile {
    min_energy: 0.02,
    max_energy: 0.06,
    status_change_probability: 0.30,
};

const THERMOSTAT: DeviceProfile = DeviceProfile {
    min_energy: 0.5,
    max_energy: 1.5,
    status_change_probability: 0.10,
};

const BLIND: DeviceProfile = DeviceProfile {
    min_energy: 0.01,
    max_energy: 0.03,
    status_change_probability: 0.20,
};

const TV: DeviceProfile = DeviceProfile {
    min_energy: 0.1,
    max_energy: 0.3,
    status_change_probability: 0.25,
};

const OTHER: DeviceProfile = DeviceProfile {
    min_energy: 0.05,
    max_energy: 0.2,
    status_change_probability: 0.15,
};

impl DeviceType {
    /// Simulation parameters for this type.
    #[must_use]
    pub const fn profile(self) -> &'static DeviceProfile {
        match self {
            Self::Light => &LIGHT,
            Self::Thermostat => &THERMOSTAT,
            Self::Blind => &BLIND,
            Self::Tv => &TV,
            Self::Other => &OTHER,
        }
    }
}
