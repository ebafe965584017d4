//! Room: a physical space grouping devices.

use serde::{Deserialize, Serialize};

use crate::error::{HomeSimError, ValidationError};
use crate::id::RoomId;

/// Number of rooms created when seeding an empty store.
pub const DEFAULT_ROOM_COUNT: usize = 5;

/// A stored room. Rooms are created once and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub number: String,
    pub description: String,
}

/// A room that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTemplate {
    pub number: String,
    pub description: String,
}

impl RoomTemplate {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomeSimError::Validation`] when `number` is empty.
    pub fn validate(&self) -> Result<(), HomeSimError> {
        if self.number.trim().is_empty() {
            return Err(ValidationError::EmptyRoomNumber.into());
        }
        Ok(())
    }

    /// Attach the key assigned by the store.
    #[must_use]
    pub fn into_room(self, id: RoomId) -> Room {
        Room {
            id,
            number: self.number,
            description: self.description,
        }
    }

    /// Template for the room at 1-based `position` in a seeded building.
    ///
    /// Two rooms share a floor; numbers alternate between `x02` and `x01`
    /// and every third room is a double.
    #[must_use]
    pub fn at_position(position: usize) -> Self {
        let floor = position.div_ceil(2);
        let kind = if position % 3 == 0 { "Double" } else { "Single" };
        Self {
            number: format!("{floor}0{}", position % 2 + 1),
            description: format!("{kind} room on floor {floor}"),
        }
    }
}

/// Deterministic layout of `count` rooms used when the store has none.
#[must_use]
pub fn layout(count: usize) -> Vec<RoomTemplate> {
    (1..=count).map(RoomTemplate::at_position).collect()
}
