use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use cueline_timeline_core::{
    actor::Actor,
    ids::ActorId,
    renderer::{DrawOrderStrategy, Renderer},
    timeline::Timeline,
    value::PropertyValue,
    TimelineError,
};

fn keyframe_span(timeline: &mut Timeline, actor: ActorId, end: u64) {
    timeline
        .keyframe(actor, 0, [("x", PropertyValue::Number(0.0))], None)
        .unwrap();
    timeline
        .keyframe(actor, end, [("x", PropertyValue::Number(1.0))], None)
        .unwrap();
}

#[derive(Clone, Default)]
struct RecordingRenderer {
    log: Rc<RefCell<Vec<(String, ActorId)>>>,
}

impl Renderer for RecordingRenderer {
    fn setup(&mut self, actor: &Actor) {
        self.log.borrow_mut().push(("setup".into(), actor.id()));
    }
    fn render(&mut self, actor: &Actor) {
        self.log.borrow_mut().push(("render".into(), actor.id()));
    }
    fn teardown(&mut self, actor: &Actor) {
        self.log.borrow_mut().push(("teardown".into(), actor.id()));
    }
}

/// it should recompute total duration as the max actor end: two actors of
/// 1000ms and 2000ms yield an animation length of 2000
#[test]
fn animation_length_is_the_max_actor_end() {
    let mut timeline = Timeline::new();
    let a = timeline.add_actor();
    let b = timeline.add_actor();
    keyframe_span(&mut timeline, a, 1000);
    keyframe_span(&mut timeline, b, 2000);
    assert_eq!(timeline.animation_length(), 2000);

    // Removal rescans the remaining actors.
    timeline.remove_actor(b).unwrap();
    assert_eq!(timeline.animation_length(), 1000);
    timeline.remove_actor(a).unwrap();
    assert_eq!(timeline.animation_length(), 0);
}

/// it should recompute duration through the update_actor authoring path
#[test]
fn update_actor_triggers_duration_recompute() {
    let mut timeline = Timeline::new();
    let a = timeline.add_actor();
    keyframe_span(&mut timeline, a, 1000);

    timeline
        .update_actor(a, |actor| actor.wait(3000))
        .unwrap();
    assert_eq!(timeline.animation_length(), 3000);

    timeline
        .update_actor(a, |actor| actor.remove_keyframe(3000))
        .unwrap();
    assert_eq!(timeline.animation_length(), 1000);
}

/// it should report missing actors instead of silently ignoring them
#[test]
fn missing_actor_is_reported() {
    let mut timeline = Timeline::new();
    let ghost = ActorId(42);
    assert!(matches!(
        timeline.remove_actor(ghost),
        Err(TimelineError::ActorNotFound { id }) if id == ghost
    ));
    assert!(timeline
        .keyframe(ghost, 0, [("x", PropertyValue::Number(0.0))], None)
        .is_err());
}

/// it should fire setup on attach and teardown on detach
#[test]
fn renderer_lifecycle_hooks_fire_on_attach_and_detach() {
    let mut timeline = Timeline::new();
    let renderer = RecordingRenderer::default();
    let log = Rc::clone(&renderer.log);
    timeline.set_renderer(Box::new(renderer));

    let a = timeline.add_actor();
    timeline.remove_actor(a).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![("setup".to_string(), a), ("teardown".to_string(), a)]
    );
}

/// it should dispatch actors in draw order, and move_to_layer reorders it
#[test]
fn render_dispatches_in_draw_order() {
    let mut timeline = Timeline::new();
    let renderer = RecordingRenderer::default();
    let log = Rc::clone(&renderer.log);
    timeline.set_renderer(Box::new(renderer));

    let a = timeline.add_actor();
    let b = timeline.add_actor();
    keyframe_span(&mut timeline, a, 1000);
    keyframe_span(&mut timeline, b, 1000);
    assert_eq!(timeline.draw_order(), &[a, b]);

    timeline.move_to_layer(b, 0).unwrap();
    assert_eq!(timeline.draw_order(), &[b, a]);

    log.borrow_mut().clear();
    timeline.render(500);
    let renders: Vec<ActorId> = log
        .borrow()
        .iter()
        .filter(|(what, _)| what == "render")
        .map(|(_, id)| *id)
        .collect();
    assert_eq!(renders, vec![b, a]);
}

/// it should reject layers beyond the actor count as LayerOutOfRange
#[test]
fn move_to_layer_rejects_out_of_range_layers() {
    let mut timeline = Timeline::new();
    let a = timeline.add_actor();
    assert!(matches!(
        timeline.move_to_layer(a, 1),
        Err(TimelineError::LayerOutOfRange {
            layer: 1,
            actor_count: 1
        })
    ));
}

struct ReverseOrder;

impl DrawOrderStrategy for ReverseOrder {
    fn compare(&self, a: &Actor, b: &Actor) -> Ordering {
        b.id().cmp(&a.id())
    }
}

/// it should re-apply a custom draw-order strategy on every draw without
/// touching the explicit layer sequence
#[test]
fn custom_draw_order_strategy_overrides_layers() {
    let mut timeline = Timeline::new();
    let renderer = RecordingRenderer::default();
    let log = Rc::clone(&renderer.log);
    timeline.set_renderer(Box::new(renderer));

    let a = timeline.add_actor();
    let b = timeline.add_actor();
    keyframe_span(&mut timeline, a, 1000);
    keyframe_span(&mut timeline, b, 1000);

    timeline.set_draw_order_strategy(Box::new(ReverseOrder));
    log.borrow_mut().clear();
    timeline.render(0);
    let renders: Vec<ActorId> = log
        .borrow()
        .iter()
        .filter(|(what, _)| what == "render")
        .map(|(_, id)| *id)
        .collect();
    assert_eq!(renders, vec![b, a]);
    assert_eq!(timeline.draw_order(), &[a, b]);

    timeline.clear_draw_order_strategy();
    log.borrow_mut().clear();
    timeline.render(0);
    let renders: Vec<ActorId> = log
        .borrow()
        .iter()
        .filter(|(what, _)| what == "render")
        .map(|(_, id)| *id)
        .collect();
    assert_eq!(renders, vec![a, b]);
}

/// it should reject binding to unknown event names
#[test]
fn binding_an_unknown_event_name_is_rejected() {
    let mut timeline = Timeline::new();
    let err = timeline.bind_by_name("onWarpSpeed", |_| {}).unwrap_err();
    assert!(matches!(err, TimelineError::InvalidEventName { .. }));
    assert!(timeline.bind_by_name("onFrameRender", |_| {}).is_ok());
}
