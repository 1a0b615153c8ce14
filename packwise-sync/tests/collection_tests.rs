use chrono::NaiveDate;
use packwise_model::{
    Calculation, Day, DefaultItemRule, OverrideScope, Person, RuleOverride, Trip, TripSnapshot,
};
use packwise_sync::{purge_snapshot, purge_tombstones, MergeError, MergeResolver};
use packwise_types::{HybridTimestamp, PersonId, SyncMeta, Synced, TripId};
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("packwise_sync=debug")
        .try_init();
}

fn person(id: u128, name: &str, version: u64, wall: u64) -> Person {
    Person {
        meta: SyncMeta::at(PersonId::from_u128(id), HybridTimestamp::new(wall, 0), version),
        ..Person::new(TripId::from_u128(1), name)
    }
}

// ── merge_collections ────────────────────────────────────────────

#[test]
fn one_sided_entities_pass_through() {
    let resolver = MergeResolver::default();
    let local = vec![person(1, "a", 0, 10)];
    let remote = vec![person(2, "b", 0, 10)];
    let outcome = resolver.merge_collections(&local, &remote).unwrap();
    let names: Vec<&str> = outcome.merged.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(outcome.is_clean());
}

#[test]
fn shared_ids_are_merged_and_sorted() {
    init_tracing();
    let resolver = MergeResolver::default();
    let local = vec![person(3, "c-old", 1, 10), person(1, "a-new", 2, 10)];
    let remote = vec![person(1, "a-old", 1, 10), person(3, "c-new", 2, 10)];
    let outcome = resolver.merge_collections(&local, &remote).unwrap();
    let names: Vec<&str> = outcome.merged.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a-new", "c-new"]);
}

#[test]
fn tombstones_survive_collection_merge() {
    let resolver = MergeResolver::default();
    let mut gone = person(1, "gone", 1, 10);
    gone.meta.tombstone();
    let stale = person(1, "gone", 1, 10);

    let outcome = resolver.merge_collections(&[stale], &[gone]).unwrap();
    assert_eq!(outcome.merged.len(), 1);
    assert!(outcome.merged[0].is_deleted());
}

#[test]
fn indeterminate_pairs_are_collected() {
    let resolver = MergeResolver::default();
    let outcome = resolver
        .merge_collections(&[person(1, "mine", 2, 10)], &[person(1, "theirs", 2, 10)])
        .unwrap();
    assert_eq!(outcome.merged[0].name, "mine");
    assert_eq!(outcome.conflicts.len(), 1);
    assert!(!outcome.is_clean());
}

// ── merge_replicas ───────────────────────────────────────────────

#[test]
fn three_replicas_converge_on_highest_version() {
    let resolver = MergeResolver::default();
    let outcome = resolver
        .merge_replicas(&[
            vec![person(1, "v1", 1, 10)],
            vec![person(1, "v3", 3, 5)],
            vec![person(1, "v2", 2, 20), person(2, "only-here", 0, 1)],
        ])
        .unwrap();
    let names: Vec<&str> = outcome.merged.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["v3", "only-here"]);
}

// ── purge_tombstones ─────────────────────────────────────────────

#[test]
fn purge_drops_only_acknowledged_tombstones() {
    let mut old_dead = person(1, "old", 1, 10);
    old_dead.meta.is_deleted = true;
    let mut new_dead = person(2, "new", 1, 50);
    new_dead.meta.is_deleted = true;
    let old_live = person(3, "live", 1, 10);

    let mut people = vec![old_dead, new_dead, old_live];
    let purged = purge_tombstones(&mut people, HybridTimestamp::new(20, 0));
    assert_eq!(purged, 1);
    let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["new", "live"]);
}

#[test]
fn snapshot_purge_keeps_day_tombstones() {
    let trip = Trip::new("Coast");
    let trip_id = trip.id();
    let mut snap = TripSnapshot::new(trip);

    let mut gone_day = Day::new(
        trip_id,
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        "Nice",
        "sunny",
    );
    gone_day.meta.tombstone();
    snap.days.push(gone_day);
    snap.days.push(Day::new(
        trip_id,
        NaiveDate::from_ymd_opt(2026, 9, 2).unwrap(),
        "Nice",
        "rain",
    ));

    let mut gone_person = Person::new(trip_id, "Left early");
    gone_person.meta.tombstone();
    snap.people.push(gone_person);
    snap.people.push(Person::new(trip_id, "Stays"));

    let rule = DefaultItemRule::new("Umbrella", Calculation::per_day(1));
    let rule_id = rule.id();
    let mut stale = RuleOverride::new(trip_id, rule_id, OverrideScope::Day(1)).count(3);
    stale.meta.tombstone();
    snap.overrides.push(stale);

    let purged = purge_snapshot(&mut snap, HybridTimestamp::new(u64::MAX, 0));
    assert_eq!(purged, 2);
    assert_eq!(snap.days.len(), 2);
    assert!(snap.days.iter().any(|d| d.is_deleted()));
    assert_eq!(snap.people.len(), 1);
    assert!(snap.overrides.is_empty());

    let dates: Vec<NaiveDate> = snap.ordered_days().iter().map(|d| d.date).collect();
    assert_eq!(dates[1], NaiveDate::from_ymd_opt(2026, 9, 2).unwrap());
}

// ── merge_snapshots ──────────────────────────────────────────────

#[test]
fn snapshots_of_one_trip_merge_every_set() {
    let trip = Trip::new("Alps");
    let trip_id = trip.id();
    let mut local = TripSnapshot::new(trip.clone());
    let mut remote = TripSnapshot::new(trip);

    // Local adds a person and a day, remote attaches a rule and an override.
    local.people.push(Person::new(trip_id, "Ana").with_age(30));
    local.days.push(Day::new(
        trip_id,
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        "Chamonix",
        "snow",
    ));
    let rule = DefaultItemRule::new("Gloves", Calculation::per_person(1));
    let rule_id = rule.id();
    remote.attach(rule);
    remote
        .overrides
        .push(RuleOverride::new(trip_id, rule_id, OverrideScope::Trip).count(2));

    // Remote renamed the trip.
    remote.trip.title = "Alps 2026".to_string();
    remote.trip.meta.touch();

    let outcome = MergeResolver::default().merge_snapshots(&local, &remote).unwrap();
    let merged = outcome.merged;
    assert_eq!(merged.trip.title, "Alps 2026");
    assert_eq!(merged.people.len(), 1);
    assert_eq!(merged.days.len(), 1);
    assert_eq!(merged.rules.len(), 1);
    assert_eq!(merged.trip_rules.len(), 1);
    assert_eq!(merged.overrides.len(), 1);
    assert!(outcome.conflicts.is_empty());
}

#[test]
fn snapshot_merge_is_symmetric_when_decidable() {
    let trip = Trip::new("Alps");
    let trip_id = trip.id();
    let mut local = TripSnapshot::new(trip.clone());
    let mut remote = TripSnapshot::new(trip);

    let p = Person::new(trip_id, "Ben");
    let mut p_deleted = p.clone();
    p_deleted.meta.tombstone();
    local.people.push(p);
    remote.people.push(p_deleted);

    let resolver = MergeResolver::default();
    let ab = resolver.merge_snapshots(&local, &remote).unwrap();
    let ba = resolver.merge_snapshots(&remote, &local).unwrap();
    assert_eq!(ab.merged, ba.merged);
    assert!(ab.merged.live_people().is_empty());
}

#[test]
fn snapshots_of_different_trips_are_rejected() {
    let a = TripSnapshot::new(Trip::new("A"));
    let b = TripSnapshot::new(Trip::new("B"));
    let err = MergeResolver::default().merge_snapshots(&a, &b).unwrap_err();
    assert!(matches!(err, MergeError::TripMismatch { .. }));
}

#[test]
fn merged_snapshot_survives_json_round_trip() {
    let trip = Trip::new("Alps");
    let trip_id = trip.id();
    let mut local = TripSnapshot::new(trip.clone());
    let mut remote = TripSnapshot::new(trip);

    let kid = Person::new(trip_id, "Ana").with_age(9);
    let kid_id = kid.id();
    local.people.push(kid);
    local.days.push(Day::new(
        trip_id,
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        "Chamonix",
        "snow",
    ));
    let rule = DefaultItemRule::new("Gloves", Calculation::per_person_per_day(1));
    let rule_id = rule.id();
    remote.attach(rule);
    remote.overrides.extend([
        RuleOverride::new(trip_id, rule_id, OverrideScope::Trip).count(2),
        RuleOverride::new(trip_id, rule_id, OverrideScope::PersonDay(kid_id, 0)).excluded(),
    ]);

    let merged = MergeResolver::default()
        .merge_snapshots(&local, &remote)
        .unwrap()
        .merged;

    let json = serde_json::to_value(&merged).unwrap();
    let person = &json["people"][0];
    assert_eq!(person["version"], 0);
    assert_eq!(person["is_deleted"], false);
    assert_eq!(person["age"], 9);

    let scoped = json["overrides"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["is_excluded"] == true)
        .unwrap();
    assert_eq!(scoped["day_index"], 0);
    assert_eq!(scoped["person_id"], kid_id.to_string());

    let back: TripSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back, merged);
}
