//! Cueline Timeline Core (renderer-agnostic)
//!
//! Keyframe-based animation timeline engine: actors own named property
//! tracks of keyframes; the timeline computes interpolated values at an
//! arbitrary millisecond and runs the playback scheduler that maps
//! wall-clock time onto a (possibly looping) timeline position. Rendering
//! backends and easing mathematics stay behind the `Renderer` and
//! `Interpolator` seams.

pub mod actor;
pub mod clock;
pub mod easing;
pub mod error;
pub mod events;
pub mod export;
pub mod ids;
pub mod keyframe;
pub mod playback;
pub mod renderer;
pub mod timeline;
pub mod track;
pub mod tween;
pub mod value;

// Re-exports for consumers (adapters)
pub use actor::Actor;
pub use clock::{Clock, ManualClock, SystemClock};
pub use easing::{CurveInterpolator, EasingMap, EasingSpec, Interpolator, DEFAULT_EASING};
pub use error::TimelineError;
pub use events::{EventContext, EventDispatcher, HandlerId, TimelineEvent};
pub use export::{ActorExport, KeyframeExport, TimelineExport};
pub use ids::{ActorId, IdAllocator, KeyframeId};
pub use keyframe::{KeyframePatch, KeyframeProperty};
pub use playback::{LoopCount, PlayState};
pub use renderer::{DrawOrderStrategy, NoopRenderer, Renderer};
pub use timeline::{Timeline, DEFAULT_FPS};
pub use track::PropertyTrack;
pub use tween::TweenState;
pub use value::{PropertyValue, ValueKind};
