//! A single keyframed property: one value pinned at a millisecond on one
//! named track.

use serde::{Deserialize, Serialize};

use crate::easing::{EasingMap, Interpolator};
use crate::ids::KeyframeId;
use crate::value::PropertyValue;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeyframeProperty {
    pub id: KeyframeId,
    pub millisecond: u64,
    /// Name of the owning track.
    pub name: String,
    pub value: PropertyValue,
    /// Dense per-field easing, already normalized against `value`.
    pub easing: EasingMap,
}

/// Partial overwrite for `modify_with`. Fields left as `None` are unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct KeyframePatch {
    #[serde(default)]
    pub millisecond: Option<u64>,
    #[serde(default)]
    pub value: Option<PropertyValue>,
    #[serde(default)]
    pub easing: Option<EasingMap>,
}

impl KeyframeProperty {
    pub fn new(
        id: KeyframeId,
        millisecond: u64,
        name: impl Into<String>,
        value: PropertyValue,
        easing: EasingMap,
    ) -> Self {
        Self {
            id,
            millisecond,
            name: name.into(),
            value,
            easing,
        }
    }

    /// Overwrite any subset of millisecond/value/easing. The caller is
    /// responsible for re-sorting the owning track and rebuilding caches.
    pub fn modify_with(&mut self, patch: &KeyframePatch) {
        if let Some(ms) = patch.millisecond {
            self.millisecond = ms;
        }
        if let Some(value) = &patch.value {
            self.value = value.clone();
        }
        if let Some(easing) = &patch.easing {
            self.easing = easing.clone();
        }
    }

    /// Value at `millisecond`, tweening toward `next` when one exists.
    ///
    /// With no successor the value holds flat. The eased blend is driven by
    /// the successor's easing map, not this keyframe's; that asymmetry is
    /// part of the track contract.
    pub fn value_at(
        &self,
        millisecond: u64,
        next: Option<&KeyframeProperty>,
        interp: &dyn Interpolator,
    ) -> PropertyValue {
        let next = match next {
            Some(n) => n,
            None => return self.value.clone(),
        };
        let span = next.millisecond.saturating_sub(self.millisecond);
        if span == 0 {
            return self.value.clone();
        }
        let fraction = (millisecond.saturating_sub(self.millisecond)) as f64 / span as f64;
        interp.interpolate(&self.value, &next.value, fraction, &next.easing)
    }
}
