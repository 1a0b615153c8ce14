//! Merge resolver for synchronized Packwise entities.
//!
//! Devices edit trips offline and exchange state later. Reconciliation is
//! whole-record last-writer-wins keyed on a per-entity version counter, with
//! soft-delete tombstones that win version ties so a stale live copy can
//! never resurrect a deleted entity. The resolver is generic over
//! [`Synced`](packwise_types::Synced) and never inspects domain fields.
//!
//! # Properties
//!
//! For a fixed pair of values:
//! - `merge(a, b)` keeps the same value as `merge(b, a)`, except for the
//!   reported indeterminate case, where the configured fallback decides
//! - `merge(a, a) == a`
//! - `merge(a, b).version == max(a.version, b.version)`
//!
//! Transport and storage are out of scope; callers hand over pairs or sets of
//! same-id entities and get back the canonical set plus a conflict report.

mod collection;
mod error;
mod merge;
mod snapshot;

pub use collection::{purge_snapshot, purge_tombstones, MergeOutcome};
pub use error::{MergeError, MergeResult};
pub use merge::{
    merge, MergeConfig, MergeConflict, MergeReason, MergeResolver, Merged, Side, TieFallback,
};
