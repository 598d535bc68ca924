//! One property track: the ordered timeline of keyframes for a single
//! named attribute of one actor.

use serde::{Deserialize, Serialize};

use crate::keyframe::KeyframeProperty;

/// Keyframes kept sorted ascending by millisecond after every mutation.
/// Ties on the same millisecond keep insertion order (stable sort); that
/// order is deterministic but not a documented guarantee.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PropertyTrack {
    pub name: String,
    keyframes: Vec<KeyframeProperty>,
}

impl PropertyTrack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyframes: Vec::new(),
        }
    }

    /// Append a keyframe and restore chronological order.
    pub fn insert(&mut self, keyframe: KeyframeProperty) {
        self.keyframes.push(keyframe);
        self.sort();
    }

    /// Remove the first keyframe pinned exactly at `millisecond`.
    /// Returns `None` (a per-track no-op) when nothing matches.
    pub fn remove_at(&mut self, millisecond: u64) -> Option<KeyframeProperty> {
        let pos = self
            .keyframes
            .iter()
            .position(|k| k.millisecond == millisecond)?;
        Some(self.keyframes.remove(pos))
    }

    #[inline]
    pub fn sort(&mut self) {
        self.keyframes.sort_by_key(|k| k.millisecond);
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&KeyframeProperty> {
        self.keyframes.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut KeyframeProperty> {
        self.keyframes.get_mut(index)
    }

    /// First keyframe exactly at `millisecond`, if any.
    #[inline]
    pub fn at_millisecond(&self, millisecond: u64) -> Option<&KeyframeProperty> {
        self.keyframes.iter().find(|k| k.millisecond == millisecond)
    }

    /// Index of the latest keyframe at or before `millisecond`.
    pub fn latest_at(&self, millisecond: u64) -> Option<usize> {
        match self
            .keyframes
            .binary_search_by_key(&millisecond, |k| k.millisecond)
        {
            // On ties the search may land anywhere in the run; step to the
            // last entry sharing the millisecond.
            Ok(mut idx) => {
                while idx + 1 < self.keyframes.len()
                    && self.keyframes[idx + 1].millisecond == millisecond
                {
                    idx += 1;
                }
                Some(idx)
            }
            Err(0) => None,
            Err(idx) => Some(idx - 1),
        }
    }

    #[inline]
    pub fn keyframes(&self) -> &[KeyframeProperty] {
        &self.keyframes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Millisecond of the first keyframe (None for an empty track).
    #[inline]
    pub fn start(&self) -> Option<u64> {
        self.keyframes.first().map(|k| k.millisecond)
    }

    /// Millisecond of the last keyframe (None for an empty track).
    #[inline]
    pub fn end(&self) -> Option<u64> {
        self.keyframes.last().map(|k| k.millisecond)
    }
}
