//! Rule engine: turns a trip's canonical entity set into a packing list.
//!
//! Stateless between calls: every computation reads only its arguments, and
//! any change to an input set means recomputing from scratch.

use crate::calculation::{calculate, MatchedPair};
use crate::condition::{matches, subject_of};
use crate::diagnostics::Diagnostic;
use crate::error::Subject;
use crate::overrides::{resolve, unmatched, OverrideTarget};
use packwise_model::{
    Day, DefaultItemRule, OverrideScope, Person, RuleOverride, Trip, TripRule, TripSnapshot,
};
use packwise_sync::{MergeResolver, MergeResult};
use packwise_types::{PersonId, RuleId, TripId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Configuration for the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Return non-fatal conditions in [`PackingList::diagnostics`]. When off
    /// they are only logged.
    pub collect_diagnostics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collect_diagnostics: true,
        }
    }
}

/// One line of the packing list.
///
/// Trip-wide entries carry neither `person_id` nor `day_index`; per-person
/// entries no day; per-day entries no person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackingListEntry {
    pub rule_id: RuleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_index: Option<usize>,
    pub item_name: String,
    pub quantity: u64,
}

impl PackingListEntry {
    /// The grid scope this entry was produced at.
    pub fn scope(&self) -> OverrideScope {
        OverrideScope::from_parts(self.person_id, self.day_index)
    }

    /// Identity of this entry for packed-state tracking.
    pub fn key(&self) -> EntryKey {
        EntryKey {
            rule_id: self.rule_id,
            scope: self.scope(),
        }
    }
}

/// Stable identity of an entry across recomputations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey {
    pub rule_id: RuleId,
    pub scope: OverrideScope,
}

/// The materialized list plus everything that was worked around.
///
/// Replaces any previously computed list wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackingList {
    pub entries: Vec<PackingListEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PackingList {
    /// True when no entry survived.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry quantities.
    pub fn total_quantity(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.quantity))
    }

    /// Entries produced by one rule.
    pub fn for_rule(&self, rule_id: RuleId) -> impl Iterator<Item = &PackingListEntry> {
        self.entries.iter().filter(move |e| e.rule_id == rule_id)
    }
}

/// Evaluates every rule attached to a trip over its person × day grid.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: EngineConfig,
}

impl RuleEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes the packing list for a canonical snapshot.
    pub fn compute(&self, snapshot: &TripSnapshot) -> PackingList {
        let list = self.evaluate_snapshot(snapshot);
        self.finish(list)
    }

    /// Computes the packing list from explicit entity sets.
    ///
    /// Output is ordered by day index, then person id, then rule id, with
    /// absent day/person sorting first. Entries whose final quantity is zero
    /// or that an override excludes are omitted.
    pub fn compute_packing_list(
        &self,
        trip: &Trip,
        days: &[Day],
        people: &[Person],
        trip_rules: &[TripRule],
        rules: &[DefaultItemRule],
        overrides: &[RuleOverride],
    ) -> PackingList {
        let list = self.evaluate(trip, days, people, trip_rules, rules, overrides);
        self.finish(list)
    }

    /// Merges two replicas of a trip and recomputes from the merged state.
    ///
    /// Indeterminate merges are appended to the list's diagnostics.
    pub fn reconcile(
        &self,
        resolver: &MergeResolver,
        local: &TripSnapshot,
        remote: &TripSnapshot,
    ) -> MergeResult<(TripSnapshot, PackingList)> {
        let outcome = resolver.merge_snapshots(local, remote)?;
        let mut list = self.evaluate_snapshot(&outcome.merged);
        for conflict in outcome.conflicts {
            report(&mut list, Diagnostic::from(conflict));
        }
        Ok((outcome.merged, self.finish(list)))
    }

    fn evaluate_snapshot(&self, snapshot: &TripSnapshot) -> PackingList {
        self.evaluate(
            &snapshot.trip,
            &snapshot.days,
            &snapshot.people,
            &snapshot.trip_rules,
            &snapshot.rules,
            &snapshot.overrides,
        )
    }

    /// Full evaluation. Every diagnostic is kept here, deduplicated, so that
    /// each one is logged once whether or not it is returned.
    fn evaluate(
        &self,
        trip: &Trip,
        days: &[Day],
        people: &[Person],
        trip_rules: &[TripRule],
        rules: &[DefaultItemRule],
        overrides: &[RuleOverride],
    ) -> PackingList {
        let trip_id = trip.id();
        let days: Vec<(usize, &Day)> = Day::indexed(trip_id, days)
            .into_iter()
            .filter(|(_, d)| d.meta.is_live())
            .collect();
        let people = Person::roster(trip_id, people);
        let rules = DefaultItemRule::attached(trip_id, trip_rules, rules);

        debug!(
            "Computing packing list for trip {}: {} rules over {} people x {} days",
            trip_id,
            rules.len(),
            people.len(),
            days.len()
        );

        let mut list = PackingList::default();
        for rule in rules {
            self.evaluate_rule(trip_id, rule, &people, &days, overrides, &mut list);
        }

        list.entries
            .sort_by_key(|e| (e.day_index, e.person_id, e.rule_id));
        list
    }

    fn finish(&self, mut list: PackingList) -> PackingList {
        if !self.config.collect_diagnostics {
            list.diagnostics.clear();
        }
        list
    }

    fn evaluate_rule(
        &self,
        trip_id: TripId,
        rule: &DefaultItemRule,
        people: &[&Person],
        days: &[(usize, &Day)],
        overrides: &[RuleOverride],
        list: &mut PackingList,
    ) {
        let rule_id = rule.id();

        // Person conditions depend only on the person, day conditions only on
        // the day, so each is evaluated once per row/column of the grid.
        let mut person_ok = vec![true; people.len()];
        let mut day_ok = vec![true; days.len()];
        for (index, condition) in rule.conditions.iter().enumerate() {
            let outcomes: Vec<_> = match subject_of(condition) {
                Subject::Person => people
                    .iter()
                    .zip(person_ok.iter_mut())
                    .filter(|(_, ok)| **ok)
                    .map(|(p, ok)| (ok, matches(condition, Some(*p), None)))
                    .collect(),
                Subject::Day => days
                    .iter()
                    .zip(day_ok.iter_mut())
                    .filter(|(_, ok)| **ok)
                    .map(|((_, d), ok)| (ok, matches(condition, None, Some(*d))))
                    .collect(),
            };

            let mut error = None;
            for (ok, outcome) in outcomes {
                match outcome {
                    Ok(matched) => *ok = matched,
                    Err(e) => {
                        *ok = false;
                        error.get_or_insert(e);
                    }
                }
            }
            if let Some(error) = error {
                report(
                    list,
                    Diagnostic::ConditionTypeMismatch {
                        rule_id,
                        condition_index: index,
                        error,
                    },
                );
            }
        }

        let mut groups: BTreeMap<OverrideScope, Vec<MatchedPair<'_>>> = BTreeMap::new();
        for (&(day_index, day), _) in days.iter().zip(&day_ok).filter(|(_, ok)| **ok) {
            for (&person, _) in people.iter().zip(&person_ok).filter(|(_, ok)| **ok) {
                let scope = group_scope(rule, person.id(), day_index);
                groups.entry(scope).or_default().push(MatchedPair {
                    person,
                    day,
                    day_index,
                });
            }
        }

        debug!("Rule {} ({}) produced {} groups", rule_id, rule.name, groups.len());

        let produced: Vec<OverrideScope> = groups.keys().copied().collect();
        for o in unmatched(overrides, trip_id, rule_id, &produced) {
            report(
                list,
                Diagnostic::UnmatchedOverride {
                    rule_id,
                    override_id: o.id(),
                    scope: o.scope,
                },
            );
        }

        for (scope, pairs) in groups {
            let calculated = calculate(&rule.calculation, &pairs);
            for error in calculated.errors {
                report(
                    list,
                    Diagnostic::CalculationError {
                        rule_id,
                        scope,
                        error,
                    },
                );
            }

            let target = OverrideTarget {
                trip_id,
                rule_id,
                scope,
            };
            let resolution = resolve(calculated.quantity, overrides, &target);
            if let Some(conflict) = resolution.conflict {
                report(
                    list,
                    Diagnostic::OverrideScopeConflict {
                        rule_id,
                        scope: conflict.scope,
                        winner: conflict.winner,
                        losers: conflict.losers,
                    },
                );
            }

            if resolution.excluded || resolution.quantity == 0 {
                continue;
            }

            list.entries.push(PackingListEntry {
                rule_id,
                person_id: scope.person_id(),
                day_index: scope.day_index(),
                item_name: rule.name.clone(),
                quantity: resolution.quantity,
            });
        }
    }
}

fn report(list: &mut PackingList, diagnostic: Diagnostic) {
    if list.diagnostics.contains(&diagnostic) {
        return;
    }
    warn!("{}", diagnostic);
    list.diagnostics.push(diagnostic);
}

/// The output scope a matched cell falls into for this rule's calculation.
fn group_scope(rule: &DefaultItemRule, person_id: PersonId, day_index: usize) -> OverrideScope {
    match (rule.calculation.per_person, rule.calculation.per_day) {
        (true, true) => OverrideScope::PersonDay(person_id, day_index),
        (true, false) => OverrideScope::Person(person_id),
        (false, true) => OverrideScope::Day(day_index),
        (false, false) => OverrideScope::Trip,
    }
}
