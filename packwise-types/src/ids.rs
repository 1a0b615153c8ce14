//! Identifier types for every synchronized entity kind.
//!
//! Each kind gets its own newtype over a UUID v7 so a `PersonId` can never be
//! passed where a `RuleId` is expected. Ordering is the UUID byte order, which
//! matches lexicographic order of the hyphenated lowercase string form; the
//! engine's output ordering and the override tie-break rely on that.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new time-ordered identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Builds an identifier from a raw 128-bit value (fixtures, replay).
            #[must_use]
            pub const fn from_u128(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parses an identifier from its string form.
            pub fn parse(s: &str) -> crate::Result<Self> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

entity_id! {
    /// Root aggregate identifier.
    TripId
}

entity_id! {
    /// Identifier of a traveller on a trip.
    PersonId
}

entity_id! {
    /// Identifier of a planned day.
    DayId
}

entity_id! {
    /// Identifier of a trip-independent packing rule template.
    RuleId
}

entity_id! {
    /// Identifier of the join entity attaching a rule to a trip.
    TripRuleId
}

entity_id! {
    /// Identifier of a per-scope rule override.
    OverrideId
}

entity_id! {
    /// Identifier of a timeline marker (leave home, arrive at destination...).
    TripEventId
}

entity_id! {
    /// Device (replica) that authored a change.
    DeviceId
}
