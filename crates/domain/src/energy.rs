//! Energy usage: consumption records and the time-of-day demand curve.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::device::DeviceType;
use crate::error::ValidationError;
use crate::id::{DeviceId, RoomId};
use crate::profile::DeviceProfile;
use crate::time::Timestamp;

/// Multiplier applied to a base energy draw for the given hour of day.
///
/// | hours | factor |
/// |-------|--------|
/// | 07–09 | 1.2 (morning peak) |
/// | 10–15 | 0.8 (daytime) |
/// | 16–21 | 1.5 (evening peak) |
/// | otherwise | 0.4 (night) |
#[must_use]
pub fn time_of_day_factor(hour: u32) -> f64 {
    match hour {
        7..=9 => 1.2,
        10..=15 => 0.8,
        16..=21 => 1.5,
        _ => 0.4,
    }
}

impl DeviceProfile {
    /// Base hourly draw range, before the time-of-day factor.
    #[must_use]
    pub fn energy_range(&self) -> RangeInclusive<f64> {
        self.min_energy..=self.max_energy
    }

    /// Range of plausible readings at the given hour of day.
    #[must_use]
    pub fn energy_range_at(&self, hour: u32) -> RangeInclusive<f64> {
        let factor = time_of_day_factor(hour);
        self.min_energy * factor..=self.max_energy * factor
    }
}

/// Check that `amount` can be stored as an energy reading.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEnergy`] for negative or non-finite values.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidEnergy(amount))
    }
}

/// A stored energy reading attributed to a device and its room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyUsage {
    pub device_id: DeviceId,
    pub room_id: RoomId,
    /// Energy consumed in kWh.
    pub energy_consumed: f64,
    pub timestamp: Timestamp,
}

/// Aggregate over a set of energy readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergySummary {
    pub readings: u64,
    pub total: f64,
    pub average: f64,
    pub peak: f64,
}

impl EnergySummary {
    /// Summarise raw readings. An empty input yields all zeros.
    #[must_use]
    pub fn from_readings<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut summary = Self::default();
        for value in readings {
            summary.readings += 1;
            summary.total += value;
            summary.peak = summary.peak.max(value);
        }
        if summary.readings > 0 {
            #[allow(clippy::cast_precision_loss)]
            let count = summary.readings as f64;
            summary.average = summary.total / count;
        }
        summary
    }
}

/// Consumption of every device of one type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeEnergy {
    pub device_type: DeviceType,
    pub summary: EnergySummary,
}
