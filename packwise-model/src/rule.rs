//! Packing rule templates and the join entity attaching them to trips.

use crate::synced_entity;
use packwise_types::{RuleId, SyncMeta, TripId, TripRuleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A trip-independent packing rule: "pack `name`, this many, when...".
///
/// Conditions are ANDed. An empty list matches every (person, day) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultItemRule {
    #[serde(flatten)]
    pub meta: SyncMeta<RuleId>,
    /// Item name; copied onto every packing-list entry the rule produces.
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    pub calculation: Calculation,
}

synced_entity!(DefaultItemRule, RuleId, "rule", purgeable);

impl DefaultItemRule {
    pub fn new(name: impl Into<String>, calculation: Calculation) -> Self {
        Self {
            meta: SyncMeta::new(RuleId::new()),
            name: name.into(),
            conditions: Vec::new(),
            calculation,
        }
    }

    /// Adds a condition, ANDed with the existing ones.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Shorthand for `meta.id`.
    pub fn id(&self) -> RuleId {
        self.meta.id
    }

    /// Live rules linked to a trip through a live [`TripRule`], by rule id.
    pub fn attached<'a>(
        trip_id: TripId,
        trip_rules: &[TripRule],
        rules: &'a [DefaultItemRule],
    ) -> Vec<&'a DefaultItemRule> {
        let linked: BTreeSet<RuleId> = trip_rules
            .iter()
            .filter(|link| link.meta.is_live() && link.trip_id == trip_id)
            .map(|link| link.rule_id)
            .collect();

        let mut attached: Vec<&DefaultItemRule> = rules
            .iter()
            .filter(|r| r.meta.is_live() && linked.contains(&r.id()))
            .collect();
        attached.sort_by_key(|r| r.id());
        attached.dedup_by_key(|r| r.id());
        attached
    }
}

/// Attaches a rule template to one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRule {
    #[serde(flatten)]
    pub meta: SyncMeta<TripRuleId>,
    pub trip_id: TripId,
    pub rule_id: RuleId,
}

synced_entity!(TripRule, TripRuleId, "trip_rule", purgeable);

impl TripRule {
    /// Links `rule_id` to `trip_id`.
    pub fn new(trip_id: TripId, rule_id: RuleId) -> Self {
        Self {
            meta: SyncMeta::new(TripRuleId::new()),
            trip_id,
            rule_id,
        }
    }
}

// ── Conditions ───────────────────────────────────────────────────

/// A rule predicate over either a person or a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    Person(PersonCondition),
    Day(DayCondition),
}

impl Condition {
    /// Shorthand for a [`PersonCondition`].
    pub fn person(field: PersonField, operator: Operator, value: impl Into<ConditionValue>) -> Self {
        Condition::Person(PersonCondition {
            field,
            operator,
            value: value.into(),
        })
    }

    /// Shorthand for a [`DayCondition`].
    pub fn day(field: DayField, operator: Operator, value: impl Into<ConditionValue>) -> Self {
        Condition::Day(DayCondition {
            field,
            operator,
            value: value.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonCondition {
    pub field: PersonField,
    pub operator: Operator,
    pub value: ConditionValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCondition {
    pub field: DayField,
    pub operator: Operator,
    pub value: ConditionValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonField {
    Age,
    Gender,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayField {
    Location,
    ExpectedClimate,
    Travel,
    /// Matches against any entry of `Day::items`.
    Items,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Bool(value)
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Number(value)
    }
}

impl From<u32> for ConditionValue {
    fn from(value: u32) -> Self {
        ConditionValue::Number(i64::from(value))
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Text(value)
    }
}

// ── Calculations ─────────────────────────────────────────────────

/// How many of an item a rule asks for, given the pairs it matched.
///
/// `per_person` / `per_day` pick the granularity of the produced entries:
/// both set yields one entry per (person, day) cell, one set yields one entry
/// per person or per day, neither yields a single trip-wide entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub base_quantity: u32,
    #[serde(default)]
    pub per_person: bool,
    #[serde(default)]
    pub per_day: bool,
    /// Scales the base by the number of days a group spans. Ignored with `per_day`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_pattern: Option<DaysPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraQuantity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub increments: Vec<Increment>,
}

impl Calculation {
    /// A single trip-wide quantity.
    pub fn fixed(quantity: u32) -> Self {
        Self {
            base_quantity: quantity,
            per_person: false,
            per_day: false,
            days_pattern: None,
            extra: None,
            increments: Vec::new(),
        }
    }

    /// `quantity` for each matched person.
    pub fn per_person(quantity: u32) -> Self {
        Self {
            per_person: true,
            ..Self::fixed(quantity)
        }
    }

    /// `quantity` for each matched day.
    pub fn per_day(quantity: u32) -> Self {
        Self {
            per_day: true,
            ..Self::fixed(quantity)
        }
    }

    /// `quantity` for each matched (person, day) cell.
    pub fn per_person_per_day(quantity: u32) -> Self {
        Self {
            per_person: true,
            per_day: true,
            ..Self::fixed(quantity)
        }
    }

    /// Scales the base by one unit every `days` days.
    pub fn every(mut self, days: u32, round_up: bool) -> Self {
        self.days_pattern = Some(DaysPattern {
            every: days,
            round_up,
        });
        self
    }

    /// Sets the spare quantity.
    pub fn with_extra(mut self, extra: ExtraQuantity) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Adds an increment term.
    pub fn with_increment(mut self, increment: Increment) -> Self {
        self.increments.push(increment);
        self
    }
}

/// "One every `every` days". `every == 0` behaves like 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysPattern {
    pub every: u32,
    #[serde(default)]
    pub round_up: bool,
}

impl DaysPattern {
    /// Number of base units covering `days` days.
    pub fn units(&self, days: u64) -> u64 {
        let every = u64::from(self.every.max(1));
        if self.round_up {
            days.div_ceil(every)
        } else {
            days / every
        }
    }
}

/// Fixed spare quantity added on top of the base ("plus one spare per person").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraQuantity {
    pub quantity: u32,
    #[serde(default)]
    pub per_person: bool,
    #[serde(default)]
    pub per_day: bool,
}

/// Additional quantity contributed by part of the matched set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Increment {
    /// `quantity` for every matched pair that also satisfies `condition`.
    When { condition: Condition, quantity: u32 },
    /// `quantity` for every full `years` of age of each matched person.
    PerAge { years: u32, quantity: u32 },
}
