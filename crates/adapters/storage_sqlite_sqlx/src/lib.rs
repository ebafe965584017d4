//! # homesim-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the port traits defined in `homesim-app::ports`
//! - Manage the single-connection `SQLite` pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Commit every write individually, rolling back and logging the query
//!   and its parameters when it fails
//!
//! ## Dependency rule
//! Depends on `homesim-app` (for port traits) and `homesim-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod device_repo;
mod energy_log;
mod error;
mod gateway;
mod pool;
mod room_repo;
mod status_log;

pub use error::StorageError;
pub use gateway::SqliteGateway;
pub use pool::{Config, Database};
