//! Whole-record merge of two versions of the same synchronized entity.
//!
//! Last-writer-wins by version counter with tombstones dominating ties:
//!
//! 1. The higher `version` wins outright.
//! 2. On equal versions, a deleted side beats a live one.
//! 3. Otherwise the later `updated_at` wins.
//! 4. If that also ties, the merge is indeterminate: the configured fallback
//!    side is kept and a [`MergeConflict`] is reported.
//!
//! The winner is returned unchanged, so the merged version is always
//! `max(local.version, remote.version)`.

use crate::error::{MergeError, MergeResult};
use packwise_types::{HybridTimestamp, Synced};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Configuration for the merge resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeConfig {
    /// Side kept when version, tombstone and timestamp all tie.
    pub tie_fallback: TieFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieFallback {
    #[default]
    KeepLocal,
    KeepRemote,
}

/// Which input a merge kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Local,
    Remote,
}

/// Why the winning side won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeReason {
    /// Both sides were identical.
    Identical,
    HigherVersion,
    Tombstone,
    LaterUpdate,
    /// Equal version, deletion state and `updated_at`; fallback applied.
    Indeterminate,
}

/// Reportable, non-fatal `MergeIndeterminate` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub kind: &'static str,
    pub entity_id: String,
    pub version: u64,
    pub updated_at: HybridTimestamp,
    pub kept: Side,
}

/// Result of merging one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T> {
    pub value: T,
    pub winner: Side,
    pub reason: MergeReason,
    pub conflict: Option<MergeConflict>,
}

impl<T> Merged<T> {
    /// Discards the merge report.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Merges two versions of one entity with the default configuration.
///
/// Never mutates either input.
pub fn merge<T>(local: &T, remote: &T) -> MergeResult<Merged<T>>
where
    T: Synced + PartialEq,
{
    MergeResolver::default().merge(local, remote)
}

/// Applies the merge rules with a fixed [`MergeConfig`].
#[derive(Debug, Clone, Default)]
pub struct MergeResolver {
    config: MergeConfig,
}

impl MergeResolver {
    /// Creates a resolver with the given configuration.
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Returns the resolver configuration.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merges `remote` into `local`, returning a new canonical value.
    pub fn merge<T>(&self, local: &T, remote: &T) -> MergeResult<Merged<T>>
    where
        T: Synced + PartialEq,
    {
        if local.id() != remote.id() {
            return Err(MergeError::IdMismatch {
                kind: T::KIND,
                local: local.id().to_string(),
                remote: remote.id().to_string(),
            });
        }

        if local == remote {
            return Ok(Merged {
                value: local.clone(),
                winner: Side::Local,
                reason: MergeReason::Identical,
                conflict: None,
            });
        }

        let (winner, reason) = decide(local, remote).unwrap_or(match self.config.tie_fallback {
            TieFallback::KeepLocal => (Side::Local, MergeReason::Indeterminate),
            TieFallback::KeepRemote => (Side::Remote, MergeReason::Indeterminate),
        });

        let conflict = (reason == MergeReason::Indeterminate).then(|| {
            warn!(
                "Indeterminate merge of {} {} at version {} ({}), keeping {:?}",
                T::KIND,
                local.id(),
                local.version(),
                local.updated_at(),
                winner
            );
            MergeConflict {
                kind: T::KIND,
                entity_id: local.id().to_string(),
                version: local.version(),
                updated_at: local.updated_at(),
                kept: winner,
            }
        });

        debug!(
            "Merged {} {}: kept {:?} ({:?}), versions {} / {}",
            T::KIND,
            local.id(),
            winner,
            reason,
            local.version(),
            remote.version()
        );

        let value = match winner {
            Side::Local => local.clone(),
            Side::Remote => remote.clone(),
        };

        Ok(Merged {
            value,
            winner,
            reason,
            conflict,
        })
    }
}

/// Picks a side by the ordered rules, or `None` when every rule ties.
fn decide<T: Synced>(local: &T, remote: &T) -> Option<(Side, MergeReason)> {
    match local.version().cmp(&remote.version()) {
        Ordering::Greater => return Some((Side::Local, MergeReason::HigherVersion)),
        Ordering::Less => return Some((Side::Remote, MergeReason::HigherVersion)),
        Ordering::Equal => {}
    }

    match (local.is_deleted(), remote.is_deleted()) {
        (true, false) => return Some((Side::Local, MergeReason::Tombstone)),
        (false, true) => return Some((Side::Remote, MergeReason::Tombstone)),
        _ => {}
    }

    match local.updated_at().cmp(&remote.updated_at()) {
        Ordering::Greater => Some((Side::Local, MergeReason::LaterUpdate)),
        Ordering::Less => Some((Side::Remote, MergeReason::LaterUpdate)),
        Ordering::Equal => None,
    }
}
