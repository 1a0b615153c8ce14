//! Reconciling two replicas of a whole trip.

use crate::collection::MergeOutcome;
use crate::error::{MergeError, MergeResult};
use crate::merge::MergeResolver;
use packwise_model::TripSnapshot;
use tracing::{info, warn};

impl MergeResolver {
    /// Merges every entity set of two snapshots of the same trip.
    ///
    /// The result is the canonical snapshot the rule engine must be re-run
    /// against. Live override-key duplicates left behind are logged; the
    /// engine resolves and reports them per evaluation.
    pub fn merge_snapshots(
        &self,
        local: &TripSnapshot,
        remote: &TripSnapshot,
    ) -> MergeResult<MergeOutcome<TripSnapshot>> {
        if local.trip_id() != remote.trip_id() {
            return Err(MergeError::TripMismatch {
                local: local.trip_id().to_string(),
                remote: remote.trip_id().to_string(),
            });
        }

        let trip = self.merge(&local.trip, &remote.trip)?;
        let days = self.merge_collections(&local.days, &remote.days)?;
        let people = self.merge_collections(&local.people, &remote.people)?;
        let trip_rules = self.merge_collections(&local.trip_rules, &remote.trip_rules)?;
        let rules = self.merge_collections(&local.rules, &remote.rules)?;
        let overrides = self.merge_collections(&local.overrides, &remote.overrides)?;

        let mut conflicts = Vec::new();
        conflicts.extend(trip.conflict);
        conflicts.extend(days.conflicts);
        conflicts.extend(people.conflicts);
        conflicts.extend(trip_rules.conflicts);
        conflicts.extend(rules.conflicts);
        conflicts.extend(overrides.conflicts);

        let merged = TripSnapshot {
            trip: trip.value,
            days: days.merged,
            people: people.merged,
            trip_rules: trip_rules.merged,
            rules: rules.merged,
            overrides: overrides.merged,
        };

        let duplicates = merged.duplicate_override_keys();
        if !duplicates.is_empty() {
            warn!(
                "Trip {} has {} override slots held by more than one live override",
                merged.trip_id(),
                duplicates.len()
            );
        }

        info!(
            "Merged trip {}: {} conflicts",
            merged.trip_id(),
            conflicts.len()
        );

        Ok(MergeOutcome { merged, conflicts })
    }
}
