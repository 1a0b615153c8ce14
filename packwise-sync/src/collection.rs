//! Merging whole entity sets between replicas.
//!
//! Distinct ids never interact, so a set merge is just the per-id merge over
//! the union of ids. Folding more than two replicas goes through
//! [`MergeResolver::merge_replicas`], which applies them in a fixed order per
//! id rather than pairing them up concurrently.

use crate::error::MergeResult;
use crate::merge::{MergeConflict, MergeResolver};
use packwise_model::TripSnapshot;
use packwise_types::{HybridTimestamp, Purgeable, Synced};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

/// A merged value plus every indeterminate conflict met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome<T> {
    pub merged: T,
    pub conflicts: Vec<MergeConflict>,
}

impl<T> MergeOutcome<T> {
    /// True when no indeterminate merge was met.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

impl MergeResolver {
    /// Merges two replicas of an entity set by id. Output is sorted by id.
    ///
    /// Entities present on one side only pass through untouched, tombstones
    /// included.
    pub fn merge_collections<T>(&self, local: &[T], remote: &[T]) -> MergeResult<MergeOutcome<Vec<T>>>
    where
        T: Synced + PartialEq,
    {
        let mut by_id: BTreeMap<T::Id, T> = BTreeMap::new();
        let mut conflicts = Vec::new();

        for entity in local.iter().chain(remote) {
            match by_id.entry(entity.id()) {
                Entry::Occupied(mut slot) => {
                    let merged = self.merge(slot.get(), entity)?;
                    conflicts.extend(merged.conflict);
                    slot.insert(merged.value);
                }
                Entry::Vacant(slot) => {
                    slot.insert(entity.clone());
                }
            }
        }

        debug!(
            "Merged {} set: {} local, {} remote, {} canonical",
            T::KIND,
            local.len(),
            remote.len(),
            by_id.len()
        );

        Ok(MergeOutcome {
            merged: by_id.into_values().collect(),
            conflicts,
        })
    }

    /// Folds any number of replicas, in the order given.
    pub fn merge_replicas<T>(&self, replicas: &[Vec<T>]) -> MergeResult<MergeOutcome<Vec<T>>>
    where
        T: Synced + PartialEq,
    {
        let mut acc = MergeOutcome {
            merged: Vec::new(),
            conflicts: Vec::new(),
        };
        for replica in replicas {
            let next = self.merge_collections(&acc.merged, replica)?;
            acc.merged = next.merged;
            acc.conflicts.extend(next.conflicts);
        }
        Ok(acc)
    }
}

/// Drops tombstones last updated before `horizon`.
///
/// `horizon` must be a timestamp every replica has acknowledged; until then a
/// tombstone is the only thing stopping a stale live copy from resurrecting
/// the entity. Returns the number of entities removed.
///
/// Only [`Purgeable`] entities can be purged; day tombstones stay in place
/// because override scopes address days by position.
pub fn purge_tombstones<T: Purgeable>(entities: &mut Vec<T>, horizon: HybridTimestamp) -> usize {
    let before = entities.len();
    entities.retain(|e| !(e.is_deleted() && e.updated_at() < horizon));
    let purged = before - entities.len();
    if purged > 0 {
        debug!("Purged {} {} tombstones older than {}", purged, T::KIND, horizon);
    }
    purged
}

/// Purges every purgeable entity set of a snapshot. Days and the trip root
/// are kept, tombstoned or not.
pub fn purge_snapshot(snapshot: &mut TripSnapshot, horizon: HybridTimestamp) -> usize {
    purge_tombstones(&mut snapshot.people, horizon)
        + purge_tombstones(&mut snapshot.trip_rules, horizon)
        + purge_tombstones(&mut snapshot.rules, horizon)
        + purge_tombstones(&mut snapshot.overrides, horizon)
}
