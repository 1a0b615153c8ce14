//! Entity model for Packwise.
//!
//! Defines the trip aggregate and everything the rule engine consumes:
//! - [`Trip`] with its [`TripEvent`] timeline: the merge root
//! - [`Day`] and [`Person`]: the grid a rule is evaluated over
//! - [`DefaultItemRule`]: a trip-independent template of [`Condition`]s plus
//!   a [`Calculation`], attached to trips through [`TripRule`]
//! - [`RuleOverride`]: a per-[`OverrideScope`] replacement or exclusion
//! - [`TripSnapshot`]: the canonical entity set handed to the engine
//!
//! Every entity here except [`TripEvent`] and [`TripSummary`] implements
//! [`Synced`] and can be reconciled by `packwise-sync`.

/// Implements [`Synced`] for an entity storing its bookkeeping in `meta`.
///
/// The `purgeable` form also opts the entity into tombstone purging.
macro_rules! synced_entity {
    ($ty:ty, $id:ty, $kind:literal, purgeable) => {
        synced_entity!($ty, $id, $kind);

        impl packwise_types::Purgeable for $ty {}
    };
    ($ty:ty, $id:ty, $kind:literal) => {
        impl packwise_types::Synced for $ty {
            type Id = $id;
            const KIND: &'static str = $kind;

            fn meta(&self) -> &packwise_types::SyncMeta<$id> {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut packwise_types::SyncMeta<$id> {
                &mut self.meta
            }
        }
    };
}

pub(crate) use synced_entity;

mod day;
mod overrides;
mod person;
mod rule;
mod snapshot;
mod trip;

pub use day::Day;
pub use overrides::{OverrideKey, OverrideScope, RuleOverride};
pub use person::{Gender, Person};
pub use rule::{
    Calculation, Condition, ConditionValue, DayCondition, DayField, DaysPattern, DefaultItemRule,
    ExtraQuantity, Increment, Operator, PersonCondition, PersonField, TripRule,
};
pub use snapshot::TripSnapshot;
pub use trip::{Trip, TripEvent, TripEventKind, TripSummary};

use packwise_types::Synced;

/// Keeps only entities that are not tombstoned.
pub fn live<T: Synced>(entities: &[T]) -> impl Iterator<Item = &T> {
    entities.iter().filter(|e| !e.is_deleted())
}
