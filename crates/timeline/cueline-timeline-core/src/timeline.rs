//! Timeline scheduler: actor ownership, duration recompute, and the
//! playback state machine mapping wall-clock time onto a loop-relative
//! position.
//!
//! Single-threaded and cooperative: the host drives `tick` at the cadence
//! given by `tick_interval_ms`, and at most one tick is armed at a time —
//! `play` arms it, `pause`/`stop` disarm it, and `tick` is a no-op unless
//! armed. Duration is always recomputed by scanning actor extents, never
//! patched incrementally.

use std::collections::BTreeMap;

use log::debug;

use crate::actor::Actor;
use crate::clock::{Clock, SystemClock};
use crate::easing::{CurveInterpolator, EasingSpec, Interpolator};
use crate::error::TimelineError;
use crate::events::{EventContext, EventDispatcher, HandlerId, TimelineEvent};
use crate::export::{ActorExport, TimelineExport};
use crate::ids::{ActorId, IdAllocator};
use crate::playback::{LoopCount, PlayState};
use crate::renderer::{DrawOrderStrategy, Renderer};
use crate::value::PropertyValue;

pub const DEFAULT_FPS: u32 = 60;

pub struct Timeline {
    ids: IdAllocator,
    /// Actors in attach order.
    actors: Vec<(ActorId, Actor)>,
    /// Draw-order sequence, independently mutable from attach order.
    draw_order: Vec<ActorId>,
    draw_strategy: Option<Box<dyn DrawOrderStrategy>>,
    /// Max actor end across all actors; recomputed on every mutation.
    animation_length: u64,
    state: PlayState,
    loops: LoopCount,
    /// Wall-clock timestamp that maps elapsed time to position 0 of the
    /// current playback. Signed so `play_from` may sit ahead of the clock.
    loop_timestamp: i64,
    paused_at: u64,
    last_rendered_ms: u64,
    fps: u32,
    tick_armed: bool,
    events: EventDispatcher,
    interp: Box<dyn Interpolator>,
    renderer: Option<Box<dyn Renderer>>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("actors", &self.actors.len())
            .field("animation_length", &self.animation_length)
            .field("state", &self.state)
            .field("fps", &self.fps)
            .finish()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    /// Build a timeline against an explicit time source (e.g. `ManualClock`
    /// for simulated playback).
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            ids: IdAllocator::new(),
            actors: Vec::new(),
            draw_order: Vec::new(),
            draw_strategy: None,
            animation_length: 0,
            state: PlayState::Stopped,
            loops: LoopCount::Infinite,
            loop_timestamp: 0,
            paused_at: 0,
            last_rendered_ms: 0,
            fps: DEFAULT_FPS,
            tick_armed: false,
            events: EventDispatcher::new(),
            interp: Box::new(CurveInterpolator),
            renderer: None,
            clock: Box::new(clock),
        }
    }

    /// Swap in a different interpolation collaborator.
    pub fn set_interpolator(&mut self, interp: impl Interpolator + 'static) {
        self.interp = Box::new(interp);
    }

    /// Attach a rendering backend. `setup` fires for every actor already
    /// attached.
    pub fn set_renderer(&mut self, mut renderer: Box<dyn Renderer>) {
        for (_, actor) in &self.actors {
            renderer.setup(actor);
        }
        self.renderer = Some(renderer);
    }

    // ---- actors -----------------------------------------------------------

    /// Create and attach a new actor, assigning it the topmost draw slot.
    pub fn add_actor(&mut self) -> ActorId {
        let id = self.ids.alloc_actor();
        let actor = Actor::new(id);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.setup(&actor);
        }
        self.actors.push((id, actor));
        self.draw_order.push(id);
        self.recalc_animation_length();
        id
    }

    /// Attach an actor reconstructed from an export, keeping its id.
    pub fn add_actor_from_export(&mut self, id: ActorId, export: &ActorExport) -> ActorId {
        self.ids.reserve_through(id);
        let actor = Actor::from_export(id, export);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.setup(&actor);
        }
        self.actors.push((id, actor));
        self.draw_order.push(id);
        self.recalc_animation_length();
        id
    }

    /// Detach an actor, firing the teardown hook and recomputing duration.
    pub fn remove_actor(&mut self, id: ActorId) -> Result<Actor, TimelineError> {
        let pos = self
            .actors
            .iter()
            .position(|(a, _)| *a == id)
            .ok_or(TimelineError::ActorNotFound { id })?;
        let (_, actor) = self.actors.remove(pos);
        self.draw_order.retain(|a| *a != id);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.teardown(&actor);
        }
        self.recalc_animation_length();
        Ok(actor)
    }

    #[inline]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors
            .iter()
            .find_map(|(a, actor)| (*a == id).then_some(actor))
    }

    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.iter().map(|(id, _)| *id).collect()
    }

    #[inline]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Mutate an actor through a closure, then recompute the timeline
    /// duration. This is the single authoring path for attached actors;
    /// actors never hold a reference back to their scheduler.
    pub fn update_actor<R>(
        &mut self,
        id: ActorId,
        f: impl FnOnce(&mut Actor) -> R,
    ) -> Result<R, TimelineError> {
        let actor = self
            .actors
            .iter_mut()
            .find_map(|(a, actor)| (*a == id).then_some(actor))
            .ok_or(TimelineError::ActorNotFound { id })?;
        let result = f(actor);
        self.recalc_animation_length();
        Ok(result)
    }

    /// Convenience wrapper over `update_actor` for the common authoring op.
    pub fn keyframe<N, I>(
        &mut self,
        id: ActorId,
        when: u64,
        values: I,
        easing: Option<&EasingSpec>,
    ) -> Result<(), TimelineError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, PropertyValue)>,
    {
        self.update_actor(id, |actor| actor.keyframe(when, values, easing))
    }

    pub fn remove_keyframe(&mut self, id: ActorId, when: u64) -> Result<(), TimelineError> {
        self.update_actor(id, |actor| actor.remove_keyframe(when))
    }

    // ---- duration ---------------------------------------------------------

    #[inline]
    pub fn animation_length(&self) -> u64 {
        self.animation_length
    }

    fn recalc_animation_length(&mut self) {
        let length = self
            .actors
            .iter()
            .map(|(_, actor)| actor.end())
            .max()
            .unwrap_or(0);
        if length != self.animation_length {
            debug!("animation length {} -> {}", self.animation_length, length);
            self.animation_length = length;
        }
    }

    // ---- draw order -------------------------------------------------------

    #[inline]
    pub fn draw_order(&self) -> &[ActorId] {
        &self.draw_order
    }

    /// Move an actor to a different layer (index in the draw order).
    pub fn move_to_layer(&mut self, id: ActorId, layer: usize) -> Result<(), TimelineError> {
        if layer >= self.draw_order.len() {
            return Err(TimelineError::LayerOutOfRange {
                layer,
                actor_count: self.draw_order.len(),
            });
        }
        let pos = self
            .draw_order
            .iter()
            .position(|a| *a == id)
            .ok_or(TimelineError::ActorNotFound { id })?;
        let actor = self.draw_order.remove(pos);
        self.draw_order.insert(layer, actor);
        Ok(())
    }

    /// Install a custom draw-order strategy, re-applied on every draw.
    pub fn set_draw_order_strategy(&mut self, strategy: Box<dyn DrawOrderStrategy>) {
        self.draw_strategy = Some(strategy);
    }

    /// Revert to insertion (layer) order.
    pub fn clear_draw_order_strategy(&mut self) {
        self.draw_strategy = None;
    }

    // ---- events -----------------------------------------------------------

    pub fn bind(
        &mut self,
        event: TimelineEvent,
        handler: impl FnMut(&EventContext) + 'static,
    ) -> HandlerId {
        self.events.bind(event, handler)
    }

    pub fn bind_by_name(
        &mut self,
        name: &str,
        handler: impl FnMut(&EventContext) + 'static,
    ) -> Result<HandlerId, TimelineError> {
        self.events.bind_by_name(name, handler)
    }

    pub fn unbind(&mut self, event: TimelineEvent, handler: Option<HandlerId>) {
        self.events.unbind(event, handler);
    }

    #[inline]
    pub fn listener_count(&self, event: TimelineEvent) -> usize {
        self.events.listener_count(event)
    }

    fn emit(&mut self, event: TimelineEvent, position_ms: u64) {
        let ctx = EventContext {
            event,
            state: self.state,
            position_ms,
        };
        self.events.emit(&ctx);
    }

    // ---- playback ---------------------------------------------------------

    #[inline]
    pub fn play_state(&self) -> PlayState {
        self.state
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    #[inline]
    pub fn last_position(&self) -> u64 {
        self.last_rendered_ms
    }

    /// Start (or resume) playback. Resuming from a pause shifts the loop
    /// origin forward by the paused interval so elapsed time excludes the
    /// pause; any other start resets the origin to now.
    pub fn play(&mut self, loops: LoopCount) {
        self.tick_armed = false;
        let now = self.clock.now_ms();
        if self.state.is_paused() {
            self.loop_timestamp += now.saturating_sub(self.paused_at) as i64;
        } else {
            self.loop_timestamp = now as i64;
        }
        self.loops = loops;
        self.state = PlayState::Playing;
        self.tick_armed = true;
        for (_, actor) in &mut self.actors {
            actor.resume_tween();
        }
        debug!("play state -> {}", self.state.name());
        self.emit(TimelineEvent::PlayStateChange, self.last_rendered_ms);
        self.emit(TimelineEvent::Play, self.last_rendered_ms);
    }

    /// Play, then rewrite the loop origin so current elapsed time equals
    /// `millisecond`.
    pub fn play_from(&mut self, millisecond: u64, loops: LoopCount) {
        self.play(loops);
        let now = self.clock.now_ms();
        self.loop_timestamp = now as i64 - millisecond as i64;
    }

    /// Pause playback, retaining position. No-op when already paused.
    pub fn pause(&mut self) {
        if self.state.is_paused() {
            return;
        }
        self.tick_armed = false;
        self.paused_at = self.clock.now_ms();
        self.state = PlayState::Paused;
        for (_, actor) in &mut self.actors {
            actor.pause_tween();
        }
        debug!("play state -> {}", self.state.name());
        self.emit(TimelineEvent::PlayStateChange, self.last_rendered_ms);
        self.emit(TimelineEvent::Pause, self.last_rendered_ms);
    }

    /// Stop playback and halt all actor tweens.
    pub fn stop(&mut self) {
        self.tick_armed = false;
        self.state = PlayState::Stopped;
        for (_, actor) in &mut self.actors {
            actor.stop_tween();
        }
        debug!("play state -> {}", self.state.name());
        self.emit(TimelineEvent::PlayStateChange, self.last_rendered_ms);
        self.emit(TimelineEvent::Stop, self.last_rendered_ms);
    }

    /// One scheduler step, driven by the host at `tick_interval_ms`
    /// cadence. Maps elapsed wall-clock time to a loop-relative position,
    /// renders it, and handles loop completion. The armed flag stays set
    /// across ticks (schedule-next before render-current); completion or an
    /// explicit pause/stop disarms it.
    pub fn tick(&mut self) {
        if !self.state.is_playing() || !self.tick_armed {
            return;
        }
        let now = self.clock.now_ms();
        let elapsed = (now as i64 - self.loop_timestamp).max(0) as u64;
        let length = self.animation_length;

        let (complete, position) = if length == 0 {
            (!matches!(self.loops, LoopCount::Infinite), 0)
        } else {
            let iteration = elapsed / length;
            if self.loops.is_complete(iteration) {
                (true, length)
            } else {
                (false, elapsed % length)
            }
        };

        self.render(position);
        if complete {
            self.stop();
            self.emit(TimelineEvent::AnimationComplete, position);
        }
    }

    /// Resolve every actor's live values at `millisecond` and dispatch them
    /// to the renderer in draw order.
    pub fn render(&mut self, millisecond: u64) {
        self.emit(TimelineEvent::BeforeDraw, millisecond);
        for (_, actor) in &mut self.actors {
            actor.calculate_position(millisecond, self.interp.as_ref());
        }
        let order = self.resolve_draw_order();
        if let Some(mut renderer) = self.renderer.take() {
            for id in &order {
                if let Some(actor) = self.actor(*id) {
                    renderer.render(actor);
                }
            }
            self.renderer = Some(renderer);
        }
        self.last_rendered_ms = millisecond;
        self.emit(TimelineEvent::FrameRender, millisecond);
    }

    /// Custom strategies are re-applied on every draw; without one the
    /// explicit layer sequence is used as-is.
    fn resolve_draw_order(&self) -> Vec<ActorId> {
        let mut order = self.draw_order.clone();
        if let Some(strategy) = &self.draw_strategy {
            order.sort_by(|a, b| match (self.actor(*a), self.actor(*b)) {
                (Some(x), Some(y)) => strategy.compare(x, y),
                _ => std::cmp::Ordering::Equal,
            });
        }
        order
    }

    // ---- frame rate -------------------------------------------------------

    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Change the target frame rate; the tick cadence re-derives from it.
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.max(1);
    }

    #[inline]
    pub fn tick_interval_ms(&self) -> u64 {
        1000 / u64::from(self.fps)
    }

    // ---- export -----------------------------------------------------------

    /// Serialize the full authored timeline state. Derived caches and live
    /// tween values are excluded; they are rebuilt on import.
    pub fn export_timeline(&self) -> TimelineExport {
        let mut actors = BTreeMap::new();
        for (id, actor) in &self.actors {
            actors.insert(*id, actor.export());
        }
        TimelineExport {
            duration: self.animation_length,
            actor_order: self.draw_order.clone(),
            actors,
        }
    }

    /// Reconstruct a timeline from an export, preserving actor ids and
    /// draw order.
    pub fn from_export(export: &TimelineExport) -> Self {
        let mut timeline = Timeline::new();
        for id in &export.actor_order {
            if let Some(actor_export) = export.actors.get(id) {
                timeline.add_actor_from_export(*id, actor_export);
            }
        }
        timeline
    }
}
