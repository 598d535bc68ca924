//! Error types for the timeline engine.
//!
//! Missing actors, tracks, and indices, unknown event names, and
//! out-of-range layers are reported explicitly rather than silently
//! ignored.

use serde::{Deserialize, Serialize};

use crate::ids::ActorId;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TimelineError {
    #[error("Actor not found: {id:?}")]
    ActorNotFound { id: ActorId },

    #[error("Track not found: {name}")]
    TrackNotFound { name: String },

    #[error("Keyframe index {index} out of range for track {track} (len {len})")]
    KeyframeIndexOutOfRange {
        track: String,
        index: usize,
        len: usize,
    },

    #[error("Unknown timeline event: {name}")]
    InvalidEventName { name: String },

    #[error("Layer {layer} out of range for {actor_count} actors")]
    LayerOutOfRange { layer: usize, actor_count: usize },
}
