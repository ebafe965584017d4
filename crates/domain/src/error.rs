//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HomeSimError`]
//! via `#[from]` or an explicit `From` impl.

/// Base error for every fallible homesim operation.
#[derive(Debug, thiserror::Error)]
pub enum HomeSimError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("room number must not be empty")]
    EmptyRoomNumber,

    #[error("unknown device type {0:?}")]
    UnknownDeviceType(String),

    #[error("unknown device status {0:?}")]
    UnknownStatus(String),

    #[error("energy amount must be a non-negative number, got {0}")]
    InvalidEnergy(f64),
}
