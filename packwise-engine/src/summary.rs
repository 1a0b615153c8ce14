use crate::engine::{EntryKey, PackingList};
use packwise_model::{TripSnapshot, TripSummary};
use std::collections::HashSet;

/// Derives the read-only summary of a trip from its computed packing list.
///
/// `packed` holds the keys the user has ticked off; keys that no longer
/// match an entry are ignored.
pub fn summarize(
    snapshot: &TripSnapshot,
    list: &PackingList,
    packed: &HashSet<EntryKey>,
) -> TripSummary {
    let packed_items = list
        .entries
        .iter()
        .filter(|e| packed.contains(&e.key()))
        .fold(0u64, |acc, e| acc.saturating_add(e.quantity));

    let trip = &snapshot.trip;
    TripSummary {
        trip_id: trip.id(),
        title: trip.title.clone(),
        description: trip.description.clone(),
        created_at: trip.meta.created_at,
        updated_at: trip.meta.updated_at,
        total_items: list.total_quantity(),
        packed_items,
        total_people: snapshot.live_people().len(),
    }
}
