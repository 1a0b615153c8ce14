//! Non-fatal conditions surfaced alongside a packing list.

use crate::error::{CalculationError, ConditionError};
use packwise_model::OverrideScope;
use packwise_sync::{MergeConflict, Side};
use packwise_types::{HybridTimestamp, OverrideId, RuleId};
use std::fmt;

/// Something the engine (or the merge that fed it) had to work around.
///
/// The packing list is still complete apart from the contribution named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A rule condition could not be evaluated; affected pairs did not match.
    ConditionTypeMismatch {
        rule_id: RuleId,
        condition_index: usize,
        error: ConditionError,
    },
    /// A calculation term was zeroed for the scope.
    CalculationError {
        rule_id: RuleId,
        scope: OverrideScope,
        error: CalculationError,
    },
    /// Several live overrides held the same slot; `winner` was used.
    OverrideScopeConflict {
        rule_id: RuleId,
        scope: OverrideScope,
        winner: OverrideId,
        losers: Vec<OverrideId>,
    },
    /// A live override that applies to none of the scopes its rule produced.
    UnmatchedOverride {
        rule_id: RuleId,
        override_id: OverrideId,
        scope: OverrideScope,
    },
    /// Two replicas tied on version, tombstone and timestamp.
    MergeIndeterminate {
        kind: &'static str,
        entity_id: String,
        version: u64,
        updated_at: HybridTimestamp,
        kept: Side,
    },
}

impl From<MergeConflict> for Diagnostic {
    fn from(conflict: MergeConflict) -> Self {
        Diagnostic::MergeIndeterminate {
            kind: conflict.kind,
            entity_id: conflict.entity_id,
            version: conflict.version,
            updated_at: conflict.updated_at,
            kept: conflict.kept,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ConditionTypeMismatch {
                rule_id,
                condition_index,
                error,
            } => write!(f, "rule {rule_id} condition #{condition_index}: {error}"),
            Diagnostic::CalculationError {
                rule_id,
                scope,
                error,
            } => write!(f, "rule {rule_id} at {scope}: {error}"),
            Diagnostic::OverrideScopeConflict {
                rule_id,
                scope,
                winner,
                losers,
            } => write!(
                f,
                "rule {rule_id} at {scope}: override {winner} shadows {} duplicate(s)",
                losers.len()
            ),
            Diagnostic::UnmatchedOverride {
                rule_id,
                override_id,
                scope,
            } => write!(
                f,
                "rule {rule_id}: override {override_id} at {scope} matches no produced entry"
            ),
            Diagnostic::MergeIndeterminate {
                kind,
                entity_id,
                version,
                kept,
                ..
            } => write!(
                f,
                "{kind} {entity_id} tied at version {version}, kept {kept:?} copy"
            ),
        }
    }
}
