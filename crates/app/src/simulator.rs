//! Simulator: seeds reference data and generates status and energy telemetry.
//!
//! The simulator keeps an in-memory copy of every device and its last known
//! status. That copy only advances after the store accepted the matching
//! status event, so it never runs ahead of the persisted log. Store failures
//! are logged and counted as zero effect; the next pass naturally retries
//! equivalent work from the last good state.

mod bootstrap;

use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

use homesim_domain::device::Device;
use homesim_domain::energy::time_of_day_factor;
use homesim_domain::id::RoomId;
use homesim_domain::room::{DEFAULT_ROOM_COUNT, Room};
use homesim_domain::status::DeviceStatus;
use homesim_domain::time;

use crate::ports::Gateway;

/// Chance that one real-time iteration also runs a status pass.
pub const LIVE_STATUS_PASS_CHANCE: f64 = 0.1;

/// During a backfill, a status pass runs on every hour offset divisible by this.
pub const BACKFILL_STATUS_PASS_EVERY_HOURS: u32 = 6;

/// Tunables fixed for the lifetime of a [`Simulator`].
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Rooms created when the store has none.
    pub room_count: usize,
    /// Wall-clock pacing divisor for the real-time loop (higher is faster).
    pub simulation_speed: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            room_count: DEFAULT_ROOM_COUNT,
            simulation_speed: 1.0,
        }
    }
}

/// A device together with its last successfully persisted status.
///
/// `status` is `None` when no status could be read or seeded; such devices
/// are skipped by every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedDevice {
    pub device: Device,
    pub status: Option<DeviceStatus>,
}

impl TrackedDevice {
    fn is_on(&self) -> bool {
        self.status.is_some_and(DeviceStatus::is_on)
    }
}

/// Outcome of [`Simulator::generate_historical_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub records_written: usize,
    pub status_changes: usize,
    pub energy_passes: u32,
    pub status_passes: u32,
}

/// Outcome of [`Simulator::run_simulation_loop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopReport {
    pub iterations: u64,
    pub records_written: usize,
    pub status_changes: usize,
}

/// Telemetry generator over a [`Gateway`] and a random source.
pub struct Simulator<S, R> {
    store: S,
    rng: R,
    simulation_speed: f64,
    rooms: Vec<Room>,
    devices: BTreeMap<RoomId, Vec<TrackedDevice>>,
}

impl<S: Gateway, R: Rng> Simulator<S, R> {
    /// Build a simulator, seeding rooms, devices and statuses as needed.
    ///
    /// Existing rooms and devices are reused, so running this against a
    /// populated store creates nothing new.
    pub async fn bootstrap(store: S, rng: R, config: &SimulatorConfig) -> Self {
        let mut simulator = Self {
            store,
            rng,
            simulation_speed: config.simulation_speed,
            rooms: Vec::new(),
            devices: BTreeMap::new(),
        };
        simulator.load_or_create_rooms(config.room_count).await;
        simulator.load_or_create_devices().await;
        tracing::info!(
            rooms = simulator.rooms.len(),
            devices = simulator.device_count(),
            "simulator initialised"
        );
        simulator
    }

    /// Rooms known to the simulator.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Every tracked device, grouped by room key.
    pub fn devices(&self) -> impl Iterator<Item = &TrackedDevice> {
        self.devices.values().flatten()
    }

    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Flip devices at random according to their type's probability.
    ///
    /// Returns the number of flips the store accepted. A rejected flip
    /// leaves the in-memory status untouched.
    #[tracing::instrument(skip(self))]
    pub async fn simulate_device_status_changes(&mut self) -> usize {
        let Self {
            store,
            rng,
            devices,
            ..
        } = self;
        let mut changes = 0;

        for tracked in devices.values_mut().flatten() {
            let Some(current) = tracked.status else {
                continue;
            };
            let probability = tracked.device.device_type.profile().status_change_probability;
            if rng.r#gen::<f64>() >= probability {
                continue;
            }

            let next = current.toggled();
            match store.append_status(tracked.device.id, next).await {
                Ok(()) => {
                    tracked.status = Some(next);
                    changes += 1;
                    tracing::info!(
                        device = %tracked.device.name,
                        room_id = %tracked.device.room_id,
                        status = %next,
                        "device status changed"
                    );
                }
                Err(err) => {
                    tracing::debug!(
                        error = %err,
                        device_id = %tracked.device.id,
                        "status change not persisted, keeping previous status"
                    );
                }
            }
        }

        changes
    }

    /// Emit one energy reading for every device that is currently on.
    ///
    /// With `hours_ago > 0` the readings are backdated by that many hours
    /// and carry an explicit timestamp; otherwise the store stamps them.
    /// The time-of-day factor always follows the reading's own hour.
    /// Returns the number of readings written.
    #[tracing::instrument(skip(self))]
    pub async fn simulate_energy_usage(&mut self, hours_ago: u32) -> usize {
        let Self {
            store,
            rng,
            devices,
            ..
        } = self;
        let Some(at) = time::hours_before(time::now(), hours_ago) else {
            tracing::warn!(hours_ago, "reading time out of range, skipping energy pass");
            return 0;
        };
        let explicit = (hours_ago > 0).then_some(at);
        let factor = time_of_day_factor(time::local_hour(at));
        let mut written = 0;

        for tracked in devices.values().flatten().filter(|t| t.is_on()) {
            let device = &tracked.device;
            let energy = rng.gen_range(device.device_type.profile().energy_range()) * factor;

            match store
                .append_energy(device.id, device.room_id, energy, explicit)
                .await
            {
                Ok(_) => {
                    written += 1;
                    tracing::debug!(
                        device = %device.name,
                        kwh = energy,
                        at = %at.format("%Y-%m-%d %H:%M:%S"),
                        "energy recorded"
                    );
                }
                Err(err) => {
                    tracing::debug!(
                        error = %err,
                        device_id = %device.id,
                        "energy reading not persisted"
                    );
                }
            }
        }

        written
    }

    /// Backfill `days` of hourly history ending one hour ago.
    ///
    /// Offsets run from `days * 24` down to 1. Every offset gets an energy
    /// pass; offsets divisible by six also get a status pass first.
    #[tracing::instrument(skip(self))]
    pub async fn generate_historical_data(&mut self, days: u32) -> BackfillReport {
        let hours = days.saturating_mul(24);
        let mut report = BackfillReport::default();
        if time::hours_before(time::now(), hours).is_none() {
            tracing::warn!(
                days,
                "history reaches past the representable range, skipping backfill"
            );
            return report;
        }
        tracing::info!(days, "generating historical data");

        for offset in (1..=hours).rev() {
            if offset % BACKFILL_STATUS_PASS_EVERY_HOURS == 0 {
                report.status_passes += 1;
                report.status_changes += self.simulate_device_status_changes().await;
            }

            report.energy_passes += 1;
            report.records_written += self.simulate_energy_usage(offset).await;

            if offset % 24 == 0 {
                tracing::info!(
                    day = (hours - offset) / 24 + 1,
                    of = days,
                    records = report.records_written,
                    "historical day generated"
                );
            }
        }

        tracing::info!(
            records = report.records_written,
            status_changes = report.status_changes,
            "historical data generation complete"
        );
        report
    }

    /// Run the paced real-time loop.
    ///
    /// Runs `duration_minutes * 60 / interval_seconds` iterations. Each one
    /// may run a status pass, always runs an energy pass, and then sleeps
    /// for `interval_seconds / simulation_speed` minus the time it took.
    /// No sleep follows the last iteration.
    #[tracing::instrument(skip(self))]
    pub async fn run_simulation_loop(
        &mut self,
        interval_seconds: u64,
        duration_minutes: u64,
    ) -> LoopReport {
        let iterations = duration_minutes
            .saturating_mul(60)
            .checked_div(interval_seconds)
            .unwrap_or(0);
        let pace = self.pace(interval_seconds);
        let mut report = LoopReport::default();
        tracing::info!(interval_seconds, duration_minutes, iterations, "starting simulation loop");

        for iteration in 1..=iterations {
            let started = Instant::now();

            if self.rng.r#gen::<f64>() < LIVE_STATUS_PASS_CHANCE {
                let changes = self.simulate_device_status_changes().await;
                report.status_changes += changes;
                tracing::info!(iteration, of = iterations, changes, "device statuses changed");
            }

            let records = self.simulate_energy_usage(0).await;
            report.records_written += records;
            report.iterations += 1;
            tracing::info!(iteration, of = iterations, records, "energy records created");

            if iteration < iterations {
                let pause = pace.saturating_sub(started.elapsed());
                tracing::debug!(pause_secs = pause.as_secs_f64(), "sleeping until next iteration");
                tokio::time::sleep(pause).await;
            }
        }

        tracing::info!("simulation loop complete");
        report
    }

    /// Wall-clock length of one iteration after applying the speed divisor.
    fn pace(&self, interval_seconds: u64) -> Duration {
        #[allow(clippy::cast_precision_loss)]
        let seconds = interval_seconds as f64 / self.simulation_speed;
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
    }
}
