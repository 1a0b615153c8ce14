use packwise_types::HybridTimestamp;
use proptest::prelude::*;

// ── Construction ─────────────────────────────────────────────────

#[test]
fn now_has_zero_logical() {
    let ts = HybridTimestamp::now();
    assert_eq!(ts.logical(), 0);
    assert!(ts.wall_time() > 0);
}

#[test]
fn from_millis_has_zero_logical() {
    let ts = HybridTimestamp::from_millis(1_700_000_000_000);
    assert_eq!(ts.wall_time(), 1_700_000_000_000);
    assert_eq!(ts.logical(), 0);
}

// ── Ordering ─────────────────────────────────────────────────────

#[test]
fn logical_breaks_wall_time_ties() {
    assert!(HybridTimestamp::new(100, 0) < HybridTimestamp::new(100, 1));
    assert!(HybridTimestamp::new(99, 7) < HybridTimestamp::new(100, 0));
}

// ── tick / observe ───────────────────────────────────────────────

#[test]
fn tick_from_future_wall_time_bumps_logical() {
    let future = HybridTimestamp::new(u64::MAX / 2, 3);
    let next = future.tick();
    assert_eq!(next.wall_time(), future.wall_time());
    assert_eq!(next.logical(), 4);
}

#[test]
fn tick_from_past_jumps_to_now() {
    let past = HybridTimestamp::new(1, 9);
    let next = past.tick();
    assert!(next.wall_time() > 1);
    assert_eq!(next.logical(), 0);
}

#[test]
fn observe_exceeds_remote_in_the_future() {
    let local = HybridTimestamp::new(10, 0);
    let remote = HybridTimestamp::new(u64::MAX / 2, 5);
    let merged = local.observe(&remote);
    assert!(merged > remote);
    assert!(merged > local);
    assert_eq!(merged.logical(), 6);
}

// ── Display / FromStr ────────────────────────────────────────────

#[test]
fn display_parse_round_trip() {
    let ts = HybridTimestamp::new(1234, 5);
    assert_eq!(ts.to_string(), "1234.5");
    assert_eq!("1234.5".parse::<HybridTimestamp>().unwrap(), ts);
}

#[test]
fn parse_rejects_malformed() {
    assert!("1234".parse::<HybridTimestamp>().is_err());
    assert!("a.b".parse::<HybridTimestamp>().is_err());
}

proptest! {
    #[test]
    fn tick_is_strictly_monotonic(wall in 0u64..u64::MAX / 2, logical in 0u32..1000) {
        let ts = HybridTimestamp::new(wall, logical);
        prop_assert!(ts.tick() > ts);
    }

    #[test]
    fn observe_dominates_both_inputs(
        a in (0u64..u64::MAX / 2, 0u32..1000),
        b in (0u64..u64::MAX / 2, 0u32..1000),
    ) {
        let local = HybridTimestamp::new(a.0, a.1);
        let remote = HybridTimestamp::new(b.0, b.1);
        let next = local.observe(&remote);
        prop_assert!(next > local);
        prop_assert!(next > remote);
    }
}
