//! Live tween state owned by an actor.
//!
//! The actor composes this value object instead of inheriting the tween
//! primitive: it holds the most recently resolved per-track values and the
//! pause flag, and exposes only the operations the scheduler needs.

use hashbrown::HashMap;

use crate::value::PropertyValue;

#[derive(Clone, Debug, Default)]
pub struct TweenState {
    values: HashMap<String, PropertyValue>,
    paused: bool,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest resolved value per track.
    #[inline]
    pub fn values(&self) -> &HashMap<String, PropertyValue> {
        &self.values
    }

    /// Replace the live snapshot wholesale with this frame's dense map.
    #[inline]
    pub fn set_values(&mut self, values: HashMap<String, PropertyValue>) {
        self.values = values;
    }

    #[inline]
    pub fn pause(&mut self) {
        self.paused = true;
    }

    #[inline]
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Halt the in-flight tween. The last resolved values stay readable
    /// until the next `calculate_position`.
    #[inline]
    pub fn stop(&mut self) {
        self.paused = false;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
