use crate::{live, Day, DefaultItemRule, OverrideKey, Person, RuleOverride, Trip, TripRule};
use packwise_types::TripId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The canonical entity set for one trip, as handed to the rule engine.
///
/// Tombstones are kept in the snapshot; every consumer filters them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSnapshot {
    pub trip: Trip,
    #[serde(default)]
    pub days: Vec<Day>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub trip_rules: Vec<TripRule>,
    #[serde(default)]
    pub rules: Vec<DefaultItemRule>,
    #[serde(default)]
    pub overrides: Vec<RuleOverride>,
}

impl TripSnapshot {
    /// Empty snapshot of `trip`.
    pub fn new(trip: Trip) -> Self {
        Self {
            trip,
            days: Vec::new(),
            people: Vec::new(),
            trip_rules: Vec::new(),
            rules: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Shorthand for the trip root's id.
    pub fn trip_id(&self) -> TripId {
        self.trip.id()
    }

    /// Adds a rule template and links it to this trip.
    pub fn attach(&mut self, rule: DefaultItemRule) -> &mut Self {
        let link = TripRule::new(self.trip_id(), rule.id());
        self.trip_rules.push(link);
        self.rules.push(rule);
        self
    }

    /// Days in index order: by date, then id. Tombstones keep their slot.
    pub fn ordered_days(&self) -> Vec<&Day> {
        Day::indexed(self.trip_id(), &self.days)
            .into_iter()
            .map(|(_, day)| day)
            .collect()
    }

    /// Live people of this trip, by id.
    pub fn live_people(&self) -> Vec<&Person> {
        Person::roster(self.trip_id(), &self.people)
    }

    /// Live rules attached to this trip through a live link, by rule id.
    pub fn attached_rules(&self) -> Vec<&DefaultItemRule> {
        DefaultItemRule::attached(self.trip_id(), &self.trip_rules, &self.rules)
    }

    /// Keys held by more than one live override of this trip.
    pub fn duplicate_override_keys(&self) -> Vec<OverrideKey> {
        let trip_id = self.trip_id();
        let mut counts: BTreeMap<OverrideKey, usize> = BTreeMap::new();
        for o in live(&self.overrides).filter(|o| o.trip_id == trip_id) {
            *counts.entry(o.key()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(key, _)| key)
            .collect()
    }
}
