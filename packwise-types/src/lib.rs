//! Core type definitions for Packwise.
//!
//! This crate defines the shape-independent types every other crate builds on:
//! - Entity identifiers (UUID v7 newtypes, one per entity kind)
//! - Hybrid Logical Clock timestamps used for `created_at` / `updated_at`
//! - The synchronized-entity field set ([`SyncMeta`]) and the [`Synced`]
//!   capability that the merge resolver is generic over
//!
//! Domain entities (trips, people, rules, overrides) live in `packwise-model`.

mod ids;
mod sync;
mod timestamp;

pub use ids::{DayId, DeviceId, OverrideId, PersonId, RuleId, TripEventId, TripId, TripRuleId};
pub use sync::{Purgeable, SyncMeta, Synced};
pub use timestamp::HybridTimestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
