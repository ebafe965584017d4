//! # homesim-app
//!
//! Application layer: the simulation engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `RoomRepository`: list and create rooms
//!   - `DeviceRepository`: list and create devices per room
//!   - `DeviceStatusLog`: append and query status events
//!   - `EnergyUsageLog`: append, query and summarise energy readings
//! - Provide the **Simulator**: seeding, status mutation, energy emission,
//!   historical backfill and the paced real-time loop
//! - Provide the **energy report** use-case consumed at the end of a run
//!
//! ## Dependency rule
//! Depends on `homesim-domain` only (plus `rand` and `tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod report;
pub mod simulator;

#[cfg(test)]
pub(crate) mod memory_store;
