//! Typed identifier newtypes backed by store-assigned integer keys.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a primary key returned by the store.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Access the inner key.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Whether the key is a multiple of `divisor`.
            #[must_use]
            pub const fn is_multiple_of(self, divisor: i64) -> bool {
                self.0 % divisor == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Room`](crate::room::Room).
    RoomId
);

define_id!(
    /// Unique identifier for a [`Device`](crate::device::Device).
    DeviceId
);

define_id!(
    /// Row identifier of a stored [`EnergyUsage`](crate::energy::EnergyUsage) record.
    EnergyUsageId
);
