//! Applying per-scope overrides on top of a calculated quantity.

use packwise_model::{OverrideScope, RuleOverride};
use packwise_types::{OverrideId, RuleId, TripId};

/// The produced scope an override lookup is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideTarget {
    pub trip_id: TripId,
    pub rule_id: RuleId,
    pub scope: OverrideScope,
}

/// Final quantity for a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub quantity: u64,
    pub excluded: bool,
    /// The override that decided the outcome, if any.
    pub applied: Option<OverrideId>,
    /// Set when more than one live override held the winning slot.
    pub conflict: Option<ScopeConflict>,
}

/// `OverrideScopeConflict`: several live overrides at the same scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeConflict {
    pub scope: OverrideScope,
    pub winner: OverrideId,
    pub losers: Vec<OverrideId>,
}

/// Resolves the quantity for `target` given the base calculation.
///
/// The most specific live override covering the target wins: exact
/// person+day, then person, then day, then trip-wide. Duplicates in the
/// winning slot are settled by higher version, then greater id.
pub fn resolve(base: u64, overrides: &[RuleOverride], target: &OverrideTarget) -> Resolution {
    let candidates: Vec<&RuleOverride> = overrides
        .iter()
        .filter(|o| !o.meta.is_deleted)
        .filter(|o| o.trip_id == target.trip_id && o.rule_id == target.rule_id)
        .filter(|o| o.scope.covers(&target.scope))
        .collect();

    let Some(specificity) = candidates.iter().map(|o| o.scope.specificity()).max() else {
        return Resolution {
            quantity: base,
            excluded: false,
            applied: None,
            conflict: None,
        };
    };

    let mut slot: Vec<&RuleOverride> = candidates
        .into_iter()
        .filter(|o| o.scope.specificity() == specificity)
        .collect();
    slot.sort_by(|a, b| b.meta.version.cmp(&a.meta.version).then(b.id().cmp(&a.id())));

    let winner = slot[0];
    let conflict = (slot.len() > 1).then(|| ScopeConflict {
        scope: winner.scope,
        winner: winner.id(),
        losers: slot[1..].iter().map(|o| o.id()).collect(),
    });

    let (quantity, excluded) = if winner.is_excluded {
        (0, true)
    } else {
        (winner.override_count.map_or(base, u64::from), false)
    };

    Resolution {
        quantity,
        excluded,
        applied: Some(winner.id()),
        conflict,
    }
}

/// Live overrides of one rule that cover none of the scopes the rule
/// produced, e.g. a person-scoped exclusion on a per-day rule.
pub fn unmatched<'a>(
    overrides: &'a [RuleOverride],
    trip_id: TripId,
    rule_id: RuleId,
    produced: &'a [OverrideScope],
) -> impl Iterator<Item = &'a RuleOverride> {
    overrides
        .iter()
        .filter(move |o| !o.meta.is_deleted && o.trip_id == trip_id && o.rule_id == rule_id)
        .filter(move |o| !produced.iter().any(|scope| o.scope.covers(scope)))
}
