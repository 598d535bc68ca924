//! Timeline event hooks.
//!
//! The hook set is fixed and fully enumerated; binding against an unknown
//! name is a reported error, not a silent no-op. Listeners are plain
//! `FnMut` closures keyed by a `HandlerId` returned from `bind`, since Rust
//! closures are not comparable. Unbinding without a specific handler clears
//! every listener for that hook.

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;
use crate::playback::PlayState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimelineEvent {
    FrameRender,
    AnimationComplete,
    PlayStateChange,
    Play,
    Pause,
    Stop,
    BeforeDraw,
}

impl TimelineEvent {
    pub const ALL: [TimelineEvent; 7] = [
        TimelineEvent::FrameRender,
        TimelineEvent::AnimationComplete,
        TimelineEvent::PlayStateChange,
        TimelineEvent::Play,
        TimelineEvent::Pause,
        TimelineEvent::Stop,
        TimelineEvent::BeforeDraw,
    ];

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::FrameRender => "onFrameRender",
            Self::AnimationComplete => "onAnimationComplete",
            Self::PlayStateChange => "onPlayStateChange",
            Self::Play => "onPlay",
            Self::Pause => "onPause",
            Self::Stop => "onStop",
            Self::BeforeDraw => "onBeforeDraw",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, TimelineError> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| TimelineError::InvalidEventName {
                name: name.to_string(),
            })
    }

    #[inline]
    fn index(&self) -> usize {
        Self::ALL.iter().position(|e| e == self).unwrap_or(0)
    }
}

/// Snapshot handed to listeners. Carries data, never a handle back into the
/// engine; listeners that need to mutate external state capture it.
#[derive(Debug, Clone, Copy)]
pub struct EventContext {
    pub event: TimelineEvent,
    pub state: PlayState,
    /// Timeline position for frame-driven hooks; the last rendered position
    /// for state-transition hooks.
    pub position_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(&EventContext)>;

/// Ordered listener lists, one per hook.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: [Vec<(HandlerId, Handler)>; TimelineEvent::ALL.len()],
    next_handler: u64,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: Vec<usize> = self.listeners.iter().map(Vec::len).collect();
        f.debug_struct("EventDispatcher")
            .field("listener_counts", &counts)
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`, appended after existing listeners.
    pub fn bind(
        &mut self,
        event: TimelineEvent,
        handler: impl FnMut(&EventContext) + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.listeners[event.index()].push((id, Box::new(handler)));
        id
    }

    /// Parse-then-bind for hosts that address hooks by name.
    pub fn bind_by_name(
        &mut self,
        name: &str,
        handler: impl FnMut(&EventContext) + 'static,
    ) -> Result<HandlerId, TimelineError> {
        Ok(self.bind(TimelineEvent::from_name(name)?, handler))
    }

    /// Remove one listener, or every listener for the hook when `handler`
    /// is `None`.
    pub fn unbind(&mut self, event: TimelineEvent, handler: Option<HandlerId>) {
        let list = &mut self.listeners[event.index()];
        match handler {
            Some(id) => list.retain(|(h, _)| *h != id),
            None => list.clear(),
        }
    }

    #[inline]
    pub fn listener_count(&self, event: TimelineEvent) -> usize {
        self.listeners[event.index()].len()
    }

    /// Invoke listeners for `ctx.event` in bind order.
    pub fn emit(&mut self, ctx: &EventContext) {
        for (_, handler) in &mut self.listeners[ctx.event.index()] {
            handler(ctx);
        }
    }
}
