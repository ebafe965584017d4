//! # homesim-domain
//!
//! Pure domain model for the homesim telemetry generator.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Rooms** and the deterministic layout used to seed them
//! - Define **Devices**, their types, and the per-room device layout
//! - Define **Device profiles** (energy range and status-change probability per type)
//! - Define **Status events** and **Energy usage events** (append-only records)
//! - Define the **time-of-day factor** applied to energy draws
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod energy;
pub mod profile;
pub mod room;
pub mod status;
