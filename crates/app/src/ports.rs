//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the simulator and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod event_log;
pub mod storage;

pub use event_log::{DeviceStatusLog, EnergyUsageLog};
pub use storage::{DeviceRepository, RoomRepository};

/// Everything the simulator needs from a store.
///
/// Blanket-implemented for any type providing all four ports.
pub trait Gateway: RoomRepository + DeviceRepository + DeviceStatusLog + EnergyUsageLog {}

impl<T: RoomRepository + DeviceRepository + DeviceStatusLog + EnergyUsageLog> Gateway for T {}
