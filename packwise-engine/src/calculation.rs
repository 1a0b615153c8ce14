//! Quantity calculation over a rule's matched (person, day) pairs.
//!
//! Every term is a non-negative sum or product of counts over the matched
//! set, so a strict superset of matches never yields a smaller quantity.

use crate::condition::matches;
use crate::error::CalculationError;
use packwise_model::{Calculation, Day, Increment, Person};
use packwise_types::PersonId;
use std::collections::{BTreeMap, BTreeSet};

/// One cell of the person × day grid a rule matched.
#[derive(Debug, Clone, Copy)]
pub struct MatchedPair<'a> {
    pub person: &'a Person,
    pub day: &'a Day,
    pub day_index: usize,
}

/// Calculated quantity plus the contributions that had to be zeroed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculated {
    pub quantity: u64,
    pub errors: Vec<CalculationError>,
}

/// Computes the quantity a calculation asks for over `pairs`.
///
/// Failing contributions count as zero and are returned in `errors`; the
/// rest of the formula is unaffected.
pub fn calculate(calculation: &Calculation, pairs: &[MatchedPair<'_>]) -> Calculated {
    if pairs.is_empty() {
        return Calculated {
            quantity: 0,
            errors: Vec::new(),
        };
    }

    let mut people: BTreeMap<PersonId, &Person> = BTreeMap::new();
    let mut days: BTreeSet<usize> = BTreeSet::new();
    for pair in pairs {
        people.insert(pair.person.id(), pair.person);
        days.insert(pair.day_index);
    }
    let person_count = people.len() as u64;
    let day_count = days.len() as u64;

    let person_factor = if calculation.per_person { person_count } else { 1 };
    let day_factor = match (calculation.per_day, calculation.days_pattern) {
        (true, _) => day_count,
        (false, Some(pattern)) => pattern.units(day_count),
        (false, None) => 1,
    };

    let mut quantity = u64::from(calculation.base_quantity)
        .saturating_mul(person_factor)
        .saturating_mul(day_factor);

    if let Some(extra) = calculation.extra {
        let extra_quantity = u64::from(extra.quantity)
            .saturating_mul(if extra.per_person { person_count } else { 1 })
            .saturating_mul(if extra.per_day { day_count } else { 1 });
        quantity = quantity.saturating_add(extra_quantity);
    }

    let mut errors = Vec::new();
    for increment in &calculation.increments {
        match contribution(increment, pairs, &people) {
            Ok(n) => quantity = quantity.saturating_add(n),
            Err(e) => errors.push(e),
        }
    }

    Calculated { quantity, errors }
}

fn contribution(
    increment: &Increment,
    pairs: &[MatchedPair<'_>],
    people: &BTreeMap<PersonId, &Person>,
) -> Result<u64, CalculationError> {
    match increment {
        Increment::When {
            condition,
            quantity,
        } => {
            let mut hits: u64 = 0;
            for pair in pairs {
                if matches(condition, Some(pair.person), Some(pair.day))? {
                    hits += 1;
                }
            }
            Ok(hits.saturating_mul(u64::from(*quantity)))
        }
        Increment::PerAge { years, quantity } => {
            let years = u64::from((*years).max(1));
            let ages: Vec<u64> = people.values().filter_map(|p| p.age).map(u64::from).collect();
            if ages.is_empty() {
                return Err(CalculationError::MissingField("age"));
            }
            Ok(ages
                .iter()
                .map(|age| (age / years).saturating_mul(u64::from(*quantity)))
                .fold(0u64, u64::saturating_add))
        }
    }
}
