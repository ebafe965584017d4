//! Event log ports: append-only status and energy records.

use std::future::Future;

use homesim_domain::energy::{DeviceTypeEnergy, EnergySummary, EnergyUsage};
use homesim_domain::error::HomeSimError;
use homesim_domain::id::{DeviceId, EnergyUsageId, RoomId};
use homesim_domain::status::{DeviceStatus, StatusEvent};
use homesim_domain::time::Timestamp;

/// Append-only log of device status changes.
pub trait DeviceStatusLog {
    /// Record `status` for `device_id`, timestamped by the store.
    fn append_status(
        &self,
        device_id: DeviceId,
        status: DeviceStatus,
    ) -> impl Future<Output = Result<(), HomeSimError>> + Send;

    /// Most recent status of a device, or `None` if it was never recorded.
    fn latest_status(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Option<DeviceStatus>, HomeSimError>> + Send;

    /// Status events of a device, newest first.
    fn status_history(
        &self,
        device_id: DeviceId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<StatusEvent>, HomeSimError>> + Send;
}

/// Append-only log of energy readings.
pub trait EnergyUsageLog {
    /// Record a reading. Without `timestamp` the store uses its current time.
    fn append_energy(
        &self,
        device_id: DeviceId,
        room_id: RoomId,
        energy_consumed: f64,
        timestamp: Option<Timestamp>,
    ) -> impl Future<Output = Result<EnergyUsageId, HomeSimError>> + Send;

    /// Readings attributed to a room, oldest first.
    fn energy_by_room(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<EnergyUsage>, HomeSimError>> + Send;

    /// Aggregate over one room, or over every room when `room_id` is `None`.
    fn energy_summary(
        &self,
        room_id: Option<RoomId>,
    ) -> impl Future<Output = Result<EnergySummary, HomeSimError>> + Send;

    /// Aggregate per device type, ordered by the stored type name.
    ///
    /// Restricted to one room when `room_id` is given. Types without any
    /// reading are left out.
    fn energy_by_device_type(
        &self,
        room_id: Option<RoomId>,
    ) -> impl Future<Output = Result<Vec<DeviceTypeEnergy>, HomeSimError>> + Send;
}
