//! Per-scope adjustments to a rule's calculated quantity.

use crate::synced_entity;
use packwise_types::{DeviceId, OverrideId, PersonId, RuleId, SyncMeta, TripId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Replaces or suppresses a rule's quantity within one scope of one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOverride {
    #[serde(flatten)]
    pub meta: SyncMeta<OverrideId>,
    pub rule_id: RuleId,
    pub trip_id: TripId,
    /// Persisted as the optional `person_id` / `day_index` pair.
    #[serde(flatten)]
    pub scope: OverrideScope,
    /// Replaces (not adds to) the calculated quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_count: Option<u32>,
    /// Suppresses the rule for the scope regardless of `override_count`.
    #[serde(default)]
    pub is_excluded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<DeviceId>,
}

synced_entity!(RuleOverride, OverrideId, "rule_override", purgeable);

impl RuleOverride {
    /// An override that neither replaces nor excludes; configure with the
    /// builder methods.
    pub fn new(trip_id: TripId, rule_id: RuleId, scope: OverrideScope) -> Self {
        Self {
            meta: SyncMeta::new(OverrideId::new()),
            rule_id,
            trip_id,
            scope,
            override_count: None,
            is_excluded: false,
            last_modified_by: None,
        }
    }

    /// Replaces the calculated quantity with `count`.
    pub fn count(mut self, count: u32) -> Self {
        self.override_count = Some(count);
        self
    }

    /// Suppresses the rule for the scope.
    pub fn excluded(mut self) -> Self {
        self.is_excluded = true;
        self
    }

    /// Records the device that last edited the override.
    pub fn by(mut self, device: DeviceId) -> Self {
        self.last_modified_by = Some(device);
        self
    }

    /// Shorthand for `meta.id`.
    pub fn id(&self) -> OverrideId {
        self.meta.id
    }

    /// Identity of the slot this override occupies. At most one live override
    /// per key is expected in canonical state.
    pub fn key(&self) -> OverrideKey {
        OverrideKey {
            trip_id: self.trip_id,
            rule_id: self.rule_id,
            scope: self.scope,
        }
    }
}

/// The slot an override occupies: trip, rule and scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverrideKey {
    pub trip_id: TripId,
    pub rule_id: RuleId,
    pub scope: OverrideScope,
}

/// The cells of the person × day grid an override (or a packing-list entry)
/// addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "ScopeFields", into = "ScopeFields")]
pub enum OverrideScope {
    Trip,
    Person(PersonId),
    Day(usize),
    PersonDay(PersonId, usize),
}

impl OverrideScope {
    /// Builds a scope from the persisted optional fields.
    pub fn from_parts(person_id: Option<PersonId>, day_index: Option<usize>) -> Self {
        match (person_id, day_index) {
            (None, None) => OverrideScope::Trip,
            (Some(p), None) => OverrideScope::Person(p),
            (None, Some(d)) => OverrideScope::Day(d),
            (Some(p), Some(d)) => OverrideScope::PersonDay(p, d),
        }
    }

    /// The person narrowed to, if any.
    pub fn person_id(&self) -> Option<PersonId> {
        match self {
            OverrideScope::Person(p) | OverrideScope::PersonDay(p, _) => Some(*p),
            _ => None,
        }
    }

    /// The day index narrowed to, if any.
    pub fn day_index(&self) -> Option<usize> {
        match self {
            OverrideScope::Day(d) | OverrideScope::PersonDay(_, d) => Some(*d),
            _ => None,
        }
    }

    /// Higher is more specific: person+day > person > day > trip.
    pub fn specificity(&self) -> u8 {
        match self {
            OverrideScope::Trip => 0,
            OverrideScope::Day(_) => 1,
            OverrideScope::Person(_) => 2,
            OverrideScope::PersonDay(..) => 3,
        }
    }

    /// True if an override at `self` applies to an entry produced at `target`.
    pub fn covers(&self, target: &OverrideScope) -> bool {
        match self {
            OverrideScope::Trip => true,
            OverrideScope::Person(p) => target.person_id() == Some(*p),
            OverrideScope::Day(d) => target.day_index() == Some(*d),
            OverrideScope::PersonDay(..) => self == target,
        }
    }
}

impl fmt::Display for OverrideScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideScope::Trip => write!(f, "trip"),
            OverrideScope::Person(p) => write!(f, "person {p}"),
            OverrideScope::Day(d) => write!(f, "day {d}"),
            OverrideScope::PersonDay(p, d) => write!(f, "person {p} on day {d}"),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct ScopeFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    person_id: Option<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_index: Option<usize>,
}

impl From<ScopeFields> for OverrideScope {
    fn from(fields: ScopeFields) -> Self {
        OverrideScope::from_parts(fields.person_id, fields.day_index)
    }
}

impl From<OverrideScope> for ScopeFields {
    fn from(scope: OverrideScope) -> Self {
        ScopeFields {
            person_id: scope.person_id(),
            day_index: scope.day_index(),
        }
    }
}
