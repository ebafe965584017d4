//! Seeding of rooms, devices and initial statuses.

use rand::Rng;

use homesim_domain::device::{self, Device};
use homesim_domain::room::{self, Room};
use homesim_domain::status::DeviceStatus;

use super::{Simulator, TrackedDevice};
use crate::ports::Gateway;

impl<S: Gateway, R: Rng> Simulator<S, R> {
    /// Load every room, or create `count` rooms when the store has none.
    pub(super) async fn load_or_create_rooms(&mut self, count: usize) {
        let rooms = self.store.list_rooms().await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to list rooms, treating store as empty");
            Vec::new()
        });

        if !rooms.is_empty() {
            tracing::info!(count = rooms.len(), "found existing rooms");
            self.rooms = rooms;
            return;
        }

        tracing::info!(count, "no rooms found, creating test rooms");
        for template in room::layout(count) {
            let number = template.number.clone();
            match self.store.create_room(template).await {
                Ok(room) => {
                    tracing::info!(room_number = %room.number, room_id = %room.id, "created room");
                    self.rooms.push(room);
                }
                Err(err) => {
                    tracing::warn!(error = %err, room_number = %number, "room not created");
                }
            }
        }
    }

    /// Load the devices of every known room, seeding devices and statuses
    /// where they are missing.
    pub(super) async fn load_or_create_devices(&mut self) {
        let Self {
            store,
            rng,
            rooms,
            devices,
            ..
        } = self;

        for room in rooms.iter() {
            let existing = store.list_devices_in_room(room.id).await.unwrap_or_else(|err| {
                tracing::warn!(error = %err, room_id = %room.id, "failed to list devices");
                Vec::new()
            });

            let tracked = if existing.is_empty() {
                create_devices(store, rng, room).await
            } else {
                tracing::info!(
                    count = existing.len(),
                    room_number = %room.number,
                    "found existing devices"
                );
                load_statuses(store, rng, existing).await
            };
            devices.insert(room.id, tracked);
        }
    }
}

/// Install the default device layout in an empty room.
///
/// Devices are independent: a failed insert or status write never stops the
/// next device from being created.
async fn create_devices<S: Gateway, R: Rng>(
    store: &S,
    rng: &mut R,
    room: &Room,
) -> Vec<TrackedDevice> {
    tracing::info!(room_number = %room.number, "no devices found, creating test devices");
    let mut tracked = Vec::new();

    for template in device::layout_for(room.id) {
        let name = template.name.clone();
        match store.create_device(room.id, template).await {
            Ok(device) => {
                let status = seed_status(store, rng, &device).await;
                tracing::info!(
                    device = %device.name,
                    device_id = %device.id,
                    room_number = %room.number,
                    "created device"
                );
                tracked.push(TrackedDevice { device, status });
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    device = %name,
                    room_id = %room.id,
                    "device not created"
                );
            }
        }
    }

    tracked
}

/// Read the latest status of each existing device, seeding one where none exists.
async fn load_statuses<S: Gateway, R: Rng>(
    store: &S,
    rng: &mut R,
    devices: Vec<Device>,
) -> Vec<TrackedDevice> {
    let mut tracked = Vec::with_capacity(devices.len());

    for device in devices {
        let latest = store.latest_status(device.id).await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, device_id = %device.id, "failed to read device status");
            None
        });
        let status = match latest {
            Some(status) => Some(status),
            None => seed_status(store, rng, &device).await,
        };
        tracked.push(TrackedDevice { device, status });
    }

    tracked
}

/// Persist a uniformly random status for `device`.
///
/// Returns `None` if the store rejected it.
async fn seed_status<S: Gateway, R: Rng>(
    store: &S,
    rng: &mut R,
    device: &Device,
) -> Option<DeviceStatus> {
    let status = DeviceStatus::from(rng.gen_bool(0.5));
    match store.append_status(device.id, status).await {
        Ok(()) => Some(status),
        Err(err) => {
            tracing::warn!(error = %err, device_id = %device.id, "initial status not persisted");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use homesim_domain::device::{DeviceTemplate, DeviceType};
    use homesim_domain::id::DeviceId;
    use homesim_domain::room::RoomTemplate;

    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::ports::RoomRepository;
    use crate::simulator::SimulatorConfig;

    async fn bootstrap(store: MemoryStore, seed: u64) -> Simulator<MemoryStore, StdRng> {
        Simulator::bootstrap(store, StdRng::seed_from_u64(seed), &SimulatorConfig::default()).await
    }

    #[tokio::test]
    async fn should_seed_five_rooms_with_at_least_four_devices_each_when_store_empty() {
        let sim = bootstrap(MemoryStore::default(), 1).await;

        assert_eq!(sim.rooms().len(), 5);
        for room in sim.rooms() {
            let count = sim.devices().filter(|t| t.device.room_id == room.id).count();
            assert!(count >= 4, "room {} has {count} devices", room.number);
        }
        assert_eq!(sim.device_count(), sim.store().devices().len());
    }

    #[tokio::test]
    async fn should_persist_one_initial_status_per_created_device() {
        let sim = bootstrap(MemoryStore::default(), 2).await;

        let statuses = sim.store().statuses();
        assert_eq!(statuses.len(), sim.device_count());
        for tracked in sim.devices() {
            let seeded = statuses
                .iter()
                .find(|e| e.device_id == tracked.device.id)
                .unwrap();
            assert_eq!(Some(seeded.status), tracked.status);
        }
    }

    #[tokio::test]
    async fn should_not_duplicate_rooms_or_devices_when_bootstrapped_twice() {
        let first = bootstrap(MemoryStore::default(), 3).await;
        let rooms = first.rooms().to_vec();
        let statuses: Vec<Option<DeviceStatus>> = first.devices().map(|t| t.status).collect();
        let store = first.into_store();
        let devices = store.devices().len();
        let events = store.statuses().len();

        let second = bootstrap(store, 4).await;

        assert_eq!(second.rooms(), rooms.as_slice());
        assert_eq!(second.store().devices().len(), devices);
        assert_eq!(second.store().statuses().len(), events);
        let reloaded: Vec<Option<DeviceStatus>> = second.devices().map(|t| t.status).collect();
        assert_eq!(reloaded, statuses);
    }

    #[tokio::test]
    async fn should_seed_status_for_existing_device_without_one() {
        let store = MemoryStore::default();
        let room = store
            .create_room(RoomTemplate::at_position(1))
            .await
            .unwrap();
        let device =
            store.insert_bare_device(room.id, DeviceTemplate::new(DeviceType::Tv, "Old TV"));

        let sim = bootstrap(store, 5).await;

        assert_eq!(sim.device_count(), 1);
        let tracked = sim.devices().next().unwrap();
        assert_eq!(tracked.device, device);
        assert!(tracked.status.is_some());
        assert_eq!(sim.store().statuses().len(), 1);
    }

    #[tokio::test]
    async fn should_treat_store_as_empty_when_reads_fail() {
        let store = MemoryStore::default();
        let existing = store
            .create_room(RoomTemplate::at_position(1))
            .await
            .unwrap();
        store.fail_reads(true);

        let sim = bootstrap(store, 8).await;

        assert_eq!(sim.rooms().len(), 5);
        assert!(sim.rooms().iter().all(|room| room.id != existing.id));
        for room in sim.rooms() {
            let count = sim.devices().filter(|t| t.device.room_id == room.id).count();
            assert!(count >= 4, "room {} has {count} devices", room.number);
        }
        assert!(sim.devices().all(|t| t.status.is_some()));
        assert_eq!(sim.store().devices().len(), sim.device_count());
        assert_eq!(sim.store().statuses().len(), sim.device_count());
    }

    #[tokio::test]
    async fn should_keep_creating_devices_when_one_seed_status_fails() {
        let store = MemoryStore::default();
        store.fail_status_writes_for(DeviceId::new(2));

        let sim = bootstrap(store, 6).await;

        let failed = sim
            .devices()
            .find(|t| t.device.id == DeviceId::new(2))
            .unwrap();
        assert_eq!(failed.status, None);
        assert_eq!(sim.store().devices().len(), sim.device_count());
        assert_eq!(sim.store().statuses().len(), sim.device_count() - 1);
    }

    #[tokio::test]
    async fn should_skip_untracked_status_in_every_pass() {
        let store = MemoryStore::default();
        store.fail_status_writes_for(DeviceId::new(1));
        let mut sim = bootstrap(store, 7).await;

        for _ in 0..20 {
            sim.simulate_device_status_changes().await;
            sim.simulate_energy_usage(0).await;
        }

        let store = sim.store();
        assert!(store.energy().iter().all(|e| e.device_id != DeviceId::new(1)));
        assert!(store.statuses().iter().all(|e| e.device_id != DeviceId::new(1)));
    }

    #[tokio::test]
    async fn should_end_up_empty_when_every_write_fails() {
        let store = MemoryStore::default();
        store.fail_writes(true);

        let mut sim = bootstrap(store, 8).await;

        assert!(sim.rooms().is_empty());
        assert_eq!(sim.device_count(), 0);
        assert_eq!(sim.simulate_device_status_changes().await, 0);
        assert_eq!(sim.simulate_energy_usage(0).await, 0);
    }

    #[tokio::test]
    async fn should_create_configured_number_of_rooms() {
        let config = SimulatorConfig {
            room_count: 2,
            ..SimulatorConfig::default()
        };
        let sim =
            Simulator::bootstrap(MemoryStore::default(), StdRng::seed_from_u64(9), &config).await;

        let numbers: Vec<&str> = sim.rooms().iter().map(|r| r.number.as_str()).collect();
        assert_eq!(numbers, ["102", "101"]);
    }
}
