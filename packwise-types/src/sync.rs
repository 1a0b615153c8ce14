//! The synchronized-entity capability.
//!
//! Every entity that can be edited on more than one device carries the same
//! field set: an id, creation/update timestamps, a version counter that
//! strictly increases with each mutation, and a soft-delete tombstone flag.
//! Merge logic is written once against [`Synced`] and never looks at the
//! domain fields.

use crate::HybridTimestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Sync bookkeeping shared by every synchronized entity.
///
/// Flattened into the entity's persisted form, so the stored shape is the
/// domain fields plus exactly these five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncMeta<I> {
    pub id: I,
    pub created_at: HybridTimestamp,
    pub updated_at: HybridTimestamp,
    pub version: u64,
    pub is_deleted: bool,
}

impl<I> SyncMeta<I> {
    /// Metadata for a freshly created entity: version 0, not deleted.
    #[must_use]
    pub fn new(id: I) -> Self {
        let now = HybridTimestamp::now();
        Self::at(id, now, 0)
    }

    /// Metadata with explicit clock and version (fixtures, replay, import).
    #[must_use]
    pub fn at(id: I, timestamp: HybridTimestamp, version: u64) -> Self {
        Self {
            id,
            created_at: timestamp,
            updated_at: timestamp,
            version,
            is_deleted: false,
        }
    }

    /// True unless the entity is a tombstone.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.is_deleted
    }

    /// Records a local mutation.
    ///
    /// Must be applied to the merged canonical value, never to a pre-merge
    /// copy, so the new version is above every version any replica has seen.
    pub fn touch(&mut self) {
        self.version = self.version.saturating_add(1);
        self.updated_at = self.updated_at.tick();
    }

    /// Soft-deletes the entity. The tombstone is itself a mutation.
    pub fn tombstone(&mut self) {
        self.is_deleted = true;
        self.touch();
    }

    /// Reverses a soft delete as a new mutation.
    pub fn restore(&mut self) {
        self.is_deleted = false;
        self.touch();
    }
}

/// Capability implemented by every synchronized entity.
pub trait Synced: Clone {
    /// Typed identifier of this entity kind.
    type Id: Copy + Eq + Ord + Hash + fmt::Display + fmt::Debug;

    /// Short kind name used in logs and conflict reports.
    const KIND: &'static str;

    fn meta(&self) -> &SyncMeta<Self::Id>;

    fn meta_mut(&mut self) -> &mut SyncMeta<Self::Id>;

    fn id(&self) -> Self::Id {
        self.meta().id
    }

    fn version(&self) -> u64 {
        self.meta().version
    }

    fn is_deleted(&self) -> bool {
        self.meta().is_deleted
    }

    fn updated_at(&self) -> HybridTimestamp {
        self.meta().updated_at
    }

    /// See [`SyncMeta::touch`].
    fn touch(&mut self) {
        self.meta_mut().touch();
    }
}

/// Entities whose tombstones may be physically dropped once every replica
/// has acknowledged them.
///
/// Not implemented by entities whose position in an ordered sequence is
/// referenced elsewhere: a trip's days are addressed by index, so removing a
/// deleted day would shift every later day under its overrides.
pub trait Purgeable: Synced {}
