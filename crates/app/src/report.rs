//! Energy report: consumption summaries overall, per room and per device
//! type, with the latest status changes of every device.

use homesim_domain::device::Device;
use homesim_domain::energy::{DeviceTypeEnergy, EnergySummary};
use homesim_domain::error::HomeSimError;
use homesim_domain::room::Room;
use homesim_domain::status::StatusEvent;

use crate::ports::Gateway;

/// Status events listed per device.
pub const RECENT_STATUS_LIMIT: usize = 3;

/// A device with its most recent status events, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceActivity {
    pub device: Device,
    pub recent: Vec<StatusEvent>,
}

/// Consumption of a single room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomEnergy {
    pub room: Room,
    pub summary: EnergySummary,
    pub by_type: Vec<DeviceTypeEnergy>,
    pub devices: Vec<DeviceActivity>,
}

/// Consumption across the whole building, broken down per device type and
/// per room.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReport {
    pub overall: EnergySummary,
    pub by_type: Vec<DeviceTypeEnergy>,
    pub rooms: Vec<RoomEnergy>,
}

/// Application service that summarises stored energy readings.
pub struct EnergyReportService<S> {
    store: S,
}

impl<S: Gateway> EnergyReportService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Summarise every stored reading, overall and per room.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    #[tracing::instrument(skip(self))]
    pub async fn build(&self) -> Result<EnergyReport, HomeSimError> {
        let overall = self.store.energy_summary(None).await?;
        let by_type = self.store.energy_by_device_type(None).await?;
        let mut rooms = Vec::new();
        for room in self.store.list_rooms().await? {
            let summary = self.store.energy_summary(Some(room.id)).await?;
            let by_type = self.store.energy_by_device_type(Some(room.id)).await?;
            let mut devices = Vec::new();
            for device in self.store.list_devices_in_room(room.id).await? {
                let recent = self
                    .store
                    .status_history(device.id, RECENT_STATUS_LIMIT)
                    .await?;
                devices.push(DeviceActivity { device, recent });
            }
            rooms.push(RoomEnergy {
                room,
                summary,
                by_type,
                devices,
            });
        }
        Ok(EnergyReport {
            overall,
            by_type,
            rooms,
        })
    }
}
