//! Playback state of the timeline scheduler.

use serde::{Deserialize, Serialize};

/// `Stopped` is both the initial state and reachable from every other
/// state. Transitions are serialized on the single control thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlayState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    #[inline]
    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// How many full loop iterations playback should run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LoopCount {
    #[default]
    Infinite,
    Times(u32),
}

impl LoopCount {
    /// Whether `iteration` (zero-based full traversals) has exhausted the
    /// loop target. Infinite playback never completes.
    #[inline]
    pub fn is_complete(&self, iteration: u64) -> bool {
        match self {
            LoopCount::Infinite => false,
            LoopCount::Times(n) => iteration >= u64::from(*n),
        }
    }
}
