use cueline_timeline_core::{
    actor::Actor,
    easing::CurveInterpolator,
    ids::ActorId,
    value::PropertyValue,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn number_at(actor: &Actor, track: &str) -> f64 {
    match actor.values().get(track) {
        Some(PropertyValue::Number(n)) => *n,
        other => panic!("expected number on '{track}', got {other:?}"),
    }
}

/// it should interpolate linearly between adjacent keyframes:
/// x keyframed {0: 0, 1000: 100} resolves x = 50 at 500
#[test]
fn linear_midpoint_between_keyframes() {
    let mut actor = Actor::new(ActorId(0));
    actor.keyframe(0, [("x", PropertyValue::Number(0.0))], None);
    actor.keyframe(1000, [("x", PropertyValue::Number(100.0))], None);

    actor.calculate_position(500, &CurveInterpolator);
    approx(number_at(&actor, "x"), 50.0, 1e-9);
}

/// it should hold flat past the last keyframe of a track while other
/// tracks are still tweening
#[test]
fn flat_hold_past_a_tracks_last_keyframe() {
    let mut actor = Actor::new(ActorId(0));
    actor.keyframe(0, [("x", PropertyValue::Number(0.0))], None);
    actor.keyframe(400, [("x", PropertyValue::Number(40.0))], None);
    actor.keyframe(0, [("y", PropertyValue::Number(0.0))], None);
    actor.keyframe(1000, [("y", PropertyValue::Number(100.0))], None);

    actor.calculate_position(700, &CurveInterpolator);
    approx(number_at(&actor, "x"), 40.0, 1e-9);
    approx(number_at(&actor, "y"), 70.0, 1e-9);
}

/// it should backfill cache buckets densely: a track with no keyframe at a
/// bucket timestamp inherits its nearest earlier keyframe
#[test]
fn cache_buckets_are_dense_snapshots() {
    let mut actor = Actor::new(ActorId(0));
    actor.keyframe(0, [("x", PropertyValue::Number(0.0))], None);
    actor.keyframe(1000, [("x", PropertyValue::Number(100.0))], None);
    // y only exists from 600 on; the 0-bucket must not contain it.
    actor.keyframe(600, [("y", PropertyValue::Number(6.0))], None);

    assert_eq!(actor.cache_index(), vec![0, 600, 1000]);

    actor.calculate_position(100, &CurveInterpolator);
    assert!(actor.values().get("y").is_none());
    approx(number_at(&actor, "x"), 10.0, 1e-9);

    // Inside the 600-bucket both tracks are present, x via backfill.
    actor.calculate_position(800, &CurveInterpolator);
    approx(number_at(&actor, "x"), 80.0, 1e-9);
    approx(number_at(&actor, "y"), 6.0, 1e-9);
}

/// it should not mutate the live value map for queries outside [start, end]
#[test]
fn out_of_range_queries_do_not_touch_live_values() {
    let mut actor = Actor::new(ActorId(0));
    actor.keyframe(200, [("x", PropertyValue::Number(0.0))], None);
    actor.keyframe(1000, [("x", PropertyValue::Number(100.0))], None);

    actor.calculate_position(600, &CurveInterpolator);
    let before = actor.values().clone();

    actor.calculate_position(100, &CurveInterpolator);
    assert_eq!(actor.values(), &before);
    actor.calculate_position(1500, &CurveInterpolator);
    assert_eq!(actor.values(), &before);
}

/// it should produce an update at exactly start(): the first cache bucket
/// sits at the first keyframe, so the "before any bucket" window never
/// opens for in-range queries
#[test]
fn query_at_start_resolves_the_first_bucket() {
    let mut actor = Actor::new(ActorId(0));
    actor.keyframe(200, [("x", PropertyValue::Number(7.0))], None);
    actor.keyframe(1000, [("x", PropertyValue::Number(100.0))], None);

    assert_eq!(actor.cache_index().first(), Some(&200));
    actor.calculate_position(200, &CurveInterpolator);
    approx(number_at(&actor, "x"), 7.0, 1e-9);
}

/// it should rebuild to identical cache contents when invalidated twice
/// without intervening mutation
#[test]
fn cache_rebuild_is_idempotent() {
    let mut actor = Actor::new(ActorId(0));
    actor.keyframe(0, [("x", PropertyValue::Number(0.0))], None);
    actor.keyframe(500, [("y", PropertyValue::Number(1.0))], None);
    actor.keyframe(1000, [("x", PropertyValue::Number(10.0))], None);

    let index_once = actor.cache_index();
    actor.calculate_position(750, &CurveInterpolator);
    let values_once = actor.values().clone();

    actor.invalidate_property_cache();
    assert_eq!(actor.cache_index(), index_once);
    actor.calculate_position(750, &CurveInterpolator);
    assert_eq!(actor.values(), &values_once);
}

/// it should ease composite sub-fields independently and drive the tween
/// with the successor's easing, not the origin's
#[test]
fn successor_easing_drives_the_tween() {
    let mut actor = Actor::new(ActorId(0));
    actor.keyframe(
        0,
        [("pos", PropertyValue::composite([("x", 0.0), ("y", 0.0)]))],
        Some(&"easeInQuad".into()),
    );
    actor.keyframe(
        1000,
        [("pos", PropertyValue::composite([("x", 100.0), ("y", 100.0)]))],
        Some(&"linear".into()),
    );

    // Halfway: the successor (at 1000) is linear, so the origin's
    // easeInQuad must not apply.
    actor.calculate_position(500, &CurveInterpolator);
    match actor.values().get("pos") {
        Some(PropertyValue::Composite(fields)) => {
            approx(fields["x"], 50.0, 1e-9);
            approx(fields["y"], 50.0, 1e-9);
        }
        other => panic!("expected composite, got {other:?}"),
    }
}
