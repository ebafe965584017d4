//! In-memory [`Gateway`](crate::ports::Gateway) used by the app-layer tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use homesim_domain::device::{Device, DeviceTemplate};
use homesim_domain::energy::{self, DeviceTypeEnergy, EnergySummary, EnergyUsage};
use homesim_domain::error::HomeSimError;
use homesim_domain::id::{DeviceId, EnergyUsageId, RoomId};
use homesim_domain::room::{Room, RoomTemplate};
use homesim_domain::status::{DeviceStatus, StatusEvent};
use homesim_domain::time::{self, Timestamp};

use crate::ports::{DeviceRepository, DeviceStatusLog, EnergyUsageLog, RoomRepository};

#[derive(Debug, thiserror::Error)]
#[error("injected store failure")]
struct InjectedFailure;

fn injected() -> HomeSimError {
    HomeSimError::Storage(Box::new(InjectedFailure))
}

#[derive(Default)]
struct State {
    rooms: Vec<Room>,
    devices: Vec<Device>,
    statuses: Vec<StatusEvent>,
    energy: Vec<EnergyUsage>,
    fail_reads: bool,
    fail_writes: bool,
    fail_status_for: HashSet<DeviceId>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn fail_status_writes_for(&self, device_id: DeviceId) {
        self.state.lock().unwrap().fail_status_for.insert(device_id);
    }

    pub fn devices(&self) -> Vec<Device> {
        self.state.lock().unwrap().devices.clone()
    }

    pub fn statuses(&self) -> Vec<StatusEvent> {
        self.state.lock().unwrap().statuses.clone()
    }

    pub fn energy(&self) -> Vec<EnergyUsage> {
        self.state.lock().unwrap().energy.clone()
    }

    /// Insert a device without any status event.
    pub fn insert_bare_device(&self, room_id: RoomId, template: DeviceTemplate) -> Device {
        let mut state = self.state.lock().unwrap();
        let id = DeviceId::new(next_key(state.devices.len()));
        let device = template.into_device(id, room_id);
        state.devices.push(device.clone());
        device
    }
}

fn next_key(len: usize) -> i64 {
    i64::try_from(len).unwrap() + 1
}

impl RoomRepository for MemoryStore {
    async fn list_rooms(&self) -> Result<Vec<Room>, HomeSimError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(injected());
        }
        Ok(state.rooms.clone())
    }

    async fn create_room(&self, room: RoomTemplate) -> Result<Room, HomeSimError> {
        room.validate()?;
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(injected());
        }
        let room = room.into_room(RoomId::new(next_key(state.rooms.len())));
        state.rooms.push(room.clone());
        Ok(room)
    }
}

impl DeviceRepository for MemoryStore {
    async fn list_devices_in_room(&self, room_id: RoomId) -> Result<Vec<Device>, HomeSimError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(injected());
        }
        Ok(state
            .devices
            .iter()
            .filter(|d| d.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn create_device(
        &self,
        room_id: RoomId,
        device: DeviceTemplate,
    ) -> Result<Device, HomeSimError> {
        device.validate()?;
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(injected());
        }
        let device = device.into_device(DeviceId::new(next_key(state.devices.len())), room_id);
        state.devices.push(device.clone());
        Ok(device)
    }
}

impl DeviceStatusLog for MemoryStore {
    async fn append_status(
        &self,
        device_id: DeviceId,
        status: DeviceStatus,
    ) -> Result<(), HomeSimError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes || state.fail_status_for.contains(&device_id) {
            return Err(injected());
        }
        state.statuses.push(StatusEvent {
            device_id,
            status,
            timestamp: time::now(),
        });
        Ok(())
    }

    async fn latest_status(
        &self,
        device_id: DeviceId,
    ) -> Result<Option<DeviceStatus>, HomeSimError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(injected());
        }
        Ok(state
            .statuses
            .iter()
            .rev()
            .find(|e| e.device_id == device_id)
            .map(|e| e.status))
    }

    async fn status_history(
        &self,
        device_id: DeviceId,
        limit: usize,
    ) -> Result<Vec<StatusEvent>, HomeSimError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(injected());
        }
        Ok(state
            .statuses
            .iter()
            .rev()
            .filter(|e| e.device_id == device_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

impl EnergyUsageLog for MemoryStore {
    async fn append_energy(
        &self,
        device_id: DeviceId,
        room_id: RoomId,
        energy_consumed: f64,
        timestamp: Option<Timestamp>,
    ) -> Result<EnergyUsageId, HomeSimError> {
        energy::validate_amount(energy_consumed)?;
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(injected());
        }
        state.energy.push(EnergyUsage {
            device_id,
            room_id,
            energy_consumed,
            timestamp: timestamp.unwrap_or_else(time::now),
        });
        Ok(EnergyUsageId::new(next_key(state.energy.len() - 1)))
    }

    async fn energy_by_room(&self, room_id: RoomId) -> Result<Vec<EnergyUsage>, HomeSimError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<EnergyUsage> = state
            .energy
            .iter()
            .filter(|e| e.room_id == room_id)
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.timestamp);
        Ok(rows)
    }

    async fn energy_summary(
        &self,
        room_id: Option<RoomId>,
    ) -> Result<EnergySummary, HomeSimError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(injected());
        }
        Ok(EnergySummary::from_readings(
            state
                .energy
                .iter()
                .filter(|e| room_id.is_none_or(|id| e.room_id == id))
                .map(|e| e.energy_consumed),
        ))
    }

    async fn energy_by_device_type(
        &self,
        room_id: Option<RoomId>,
    ) -> Result<Vec<DeviceTypeEnergy>, HomeSimError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(injected());
        }
        let mut groups = BTreeMap::new();
        for reading in state
            .energy
            .iter()
            .filter(|e| room_id.is_none_or(|id| e.room_id == id))
        {
            if let Some(device) = state.devices.iter().find(|d| d.id == reading.device_id) {
                groups
                    .entry(device.device_type.as_str())
                    .or_insert_with(|| (device.device_type, Vec::new()))
                    .1
                    .push(reading.energy_consumed);
            }
        }
        Ok(groups
            .into_values()
            .map(|(device_type, readings)| DeviceTypeEnergy {
                device_type,
                summary: EnergySummary::from_readings(readings),
            })
            .collect())
    }
}
