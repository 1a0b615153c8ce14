//! Packing-list rule engine for Packwise.
//!
//! Given a trip's canonical entity set, evaluates every attached
//! [`DefaultItemRule`](packwise_model::DefaultItemRule) over the trip's
//! person × day grid and materializes a [`PackingList`]:
//!
//! 1. [`condition`] decides which grid cells a rule matches
//! 2. [`calculation`] turns the matched cells into quantities, grouped at the
//!    granularity the calculation asks for
//! 3. [`overrides`] applies the most specific per-scope override
//!
//! Nothing in here fails the computation as a whole. Conditions that cannot
//! be evaluated, calculation terms that cannot be computed and duplicate
//! overrides drop only their own contribution and are reported as
//! [`Diagnostic`]s next to the entries.
//!
//! The engine is a pure function of its inputs and keeps no state between
//! calls; recompute whenever any input changes.

pub mod calculation;
pub mod condition;
mod diagnostics;
mod engine;
mod error;
pub mod overrides;
mod summary;

pub use calculation::{calculate, Calculated, MatchedPair};
pub use condition::{matches, matches_all};
pub use diagnostics::Diagnostic;
pub use engine::{EngineConfig, EntryKey, PackingList, PackingListEntry, RuleEngine};
pub use error::{CalculationError, ConditionError, Subject};
pub use overrides::{resolve, unmatched, OverrideTarget, Resolution, ScopeConflict};
pub use summary::summarize;
