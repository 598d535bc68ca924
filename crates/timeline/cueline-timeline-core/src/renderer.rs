//! Host collaborator seams: rendering and draw ordering.

use std::cmp::Ordering;

use crate::actor::Actor;

/// Rendering backend attached to a timeline. `setup`/`teardown` fire when
/// an actor is attached/detached; `render` fires once per actor per frame
/// with the actor's live values already resolved.
pub trait Renderer {
    fn setup(&mut self, actor: &Actor);
    fn render(&mut self, actor: &Actor);
    fn teardown(&mut self, actor: &Actor);
}

/// Pluggable draw-order strategy. The timeline's default is insertion
/// (layer) order; a custom strategy is re-applied on every draw.
pub trait DrawOrderStrategy {
    fn compare(&self, a: &Actor, b: &Actor) -> Ordering;
}

/// No-op renderer for hosts that only sample values.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn setup(&mut self, _actor: &Actor) {}
    fn render(&mut self, _actor: &Actor) {}
    fn teardown(&mut self, _actor: &Actor) {}
}
