//! Storage port: repository traits for reference data (rooms and devices).

use std::future::Future;

use homesim_domain::device::{Device, DeviceTemplate};
use homesim_domain::error::HomeSimError;
use homesim_domain::id::RoomId;
use homesim_domain::room::{Room, RoomTemplate};

/// Repository for [`Room`]s. Rooms are never updated or deleted.
pub trait RoomRepository {
    /// List every stored room, ordered by key.
    fn list_rooms(&self) -> impl Future<Output = Result<Vec<Room>, HomeSimError>> + Send;

    /// Persist a new room and return it with its assigned key.
    fn create_room(
        &self,
        room: RoomTemplate,
    ) -> impl Future<Output = Result<Room, HomeSimError>> + Send;
}

/// Repository for [`Device`]s. Devices are never updated or deleted.
pub trait DeviceRepository {
    /// List the devices installed in a room, ordered by key.
    fn list_devices_in_room(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<Device>, HomeSimError>> + Send;

    /// Persist a new device in `room_id` and return it with its assigned key.
    fn create_device(
        &self,
        room_id: RoomId,
        device: DeviceTemplate,
    ) -> impl Future<Output = Result<Device, HomeSimError>> + Send;
}
