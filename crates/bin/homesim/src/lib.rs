//! # homesim
//!
//! Composition root that wires the `SQLite` store into the simulator.
//!
//! ## Responsibilities
//! - Parse CLI flags and configuration (config file, env vars)
//! - Merge both into [`run::RunOptions`]
//! - Bootstrap the simulator, optionally backfill history, then run the
//!   paced live loop
//! - Stop early when the shutdown signal fires and always close the database
//!   on the way out
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

pub mod cli;
pub mod config;
pub mod run;
