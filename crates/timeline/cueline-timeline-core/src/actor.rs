//! An animatable entity: a set of property tracks plus the derived
//! millisecond cache used to resolve values at an arbitrary time.
//!
//! The cache maps each keyframed millisecond to a dense snapshot of the
//! latest keyframe per track at that millisecond, stored as `(track index,
//! keyframe index)` slots. Tracks with no keyframe at a cache timestamp
//! inherit their nearest earlier keyframe; tracks that have not started yet
//! are absent from the bucket. The "next keyframe" relationship is the
//! following index in the sorted track, re-derived on every rebuild and
//! never persisted.

use hashbrown::HashMap;
use log::debug;

use crate::easing::{EasingMap, EasingSpec, Interpolator};
use crate::error::TimelineError;
use crate::ids::{ActorId, KeyframeId};
use crate::keyframe::{KeyframePatch, KeyframeProperty};
use crate::track::PropertyTrack;
use crate::tween::TweenState;
use crate::value::PropertyValue;

#[derive(Clone, Debug)]
struct CacheBucket {
    millisecond: u64,
    /// (track index, index of the latest keyframe at or before this bucket).
    slots: Vec<(usize, usize)>,
}

#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    /// Tracks in first-keyframed order.
    tracks: Vec<PropertyTrack>,
    cache: Vec<CacheBucket>,
    next_keyframe: u32,
    tween: TweenState,
}

impl Actor {
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            tracks: Vec::new(),
            cache: Vec::new(),
            next_keyframe: 0,
            tween: TweenState::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ActorId {
        self.id
    }

    #[inline]
    pub fn track(&self, name: &str) -> Option<&PropertyTrack> {
        self.tracks.iter().find(|t| t.name == name)
    }

    #[inline]
    pub fn tracks(&self) -> &[PropertyTrack] {
        &self.tracks
    }

    pub fn track_names(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.name.clone()).collect()
    }

    /// Latest resolved value per track (the live tween snapshot).
    #[inline]
    pub fn values(&self) -> &HashMap<String, PropertyValue> {
        self.tween.values()
    }

    #[inline]
    pub fn pause_tween(&mut self) {
        self.tween.pause();
    }

    #[inline]
    pub fn resume_tween(&mut self) {
        self.tween.resume();
    }

    #[inline]
    pub fn stop_tween(&mut self) {
        self.tween.stop();
    }

    /// Minimum first-keyframe millisecond across non-empty tracks (0 if none).
    pub fn start(&self) -> u64 {
        self.tracks.iter().filter_map(|t| t.start()).min().unwrap_or(0)
    }

    /// Maximum last-keyframe millisecond across tracks (0 if none).
    pub fn end(&self) -> u64 {
        self.tracks.iter().filter_map(|t| t.end()).max().unwrap_or(0)
    }

    fn alloc_keyframe_id(&mut self) -> KeyframeId {
        let id = KeyframeId(self.next_keyframe);
        self.next_keyframe = self.next_keyframe.wrapping_add(1);
        id
    }

    fn track_index_or_create(&mut self, name: &str) -> usize {
        match self.tracks.iter().position(|t| t.name == name) {
            Some(idx) => idx,
            None => {
                self.tracks.push(PropertyTrack::new(name));
                self.tracks.len() - 1
            }
        }
    }

    /// Pin one keyframe per supplied track at `when`. Each track is
    /// re-sorted after insertion; keyframing at an occupied millisecond adds
    /// a tie rather than replacing (replacement is caller-level
    /// remove-then-insert). Rebuilds the property cache once at the end.
    pub fn keyframe<N, I>(&mut self, when: u64, values: I, easing: Option<&EasingSpec>)
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, PropertyValue)>,
    {
        for (name, value) in values {
            let name = name.into();
            let easing = EasingMap::normalize(easing, &value);
            let id = self.alloc_keyframe_id();
            let idx = self.track_index_or_create(&name);
            self.tracks[idx].insert(KeyframeProperty::new(id, when, name, value, easing));
        }
        self.invalidate_property_cache();
    }

    /// Remove the keyframe at exactly `when` from every track that has one.
    /// Tracks without a match are untouched.
    pub fn remove_keyframe(&mut self, when: u64) {
        let mut removed = false;
        for track in &mut self.tracks {
            removed |= track.remove_at(when).is_some();
        }
        if removed {
            self.invalidate_property_cache();
        }
    }

    /// Patch the keyframe at `index` (position in the sorted track), then
    /// re-sort and rebuild the cache.
    pub fn modify_keyframe(
        &mut self,
        track: &str,
        index: usize,
        patch: &KeyframePatch,
    ) -> Result<(), TimelineError> {
        let track_idx = self
            .tracks
            .iter()
            .position(|t| t.name == track)
            .ok_or_else(|| TimelineError::TrackNotFound {
                name: track.to_string(),
            })?;
        let len = self.tracks[track_idx].len();
        let keyframe = self.tracks[track_idx].get_mut(index).ok_or_else(|| {
            TimelineError::KeyframeIndexOutOfRange {
                track: track.to_string(),
                index,
                len,
            }
        })?;
        keyframe.modify_with(patch);
        self.tracks[track_idx].sort();
        self.invalidate_property_cache();
        Ok(())
    }

    /// Extend the actor's effective duration to `until` without altering its
    /// trajectory: the last pose is re-pinned at the current end and again
    /// at `until`, holding it for the extra span.
    pub fn wait(&mut self, until: u64) {
        let end = self.end();
        if until <= end {
            return;
        }
        let snapshot: Vec<(String, PropertyValue, EasingMap)> = self
            .tracks
            .iter()
            .filter_map(|t| {
                t.keyframes()
                    .last()
                    .map(|k| (t.name.clone(), k.value.clone(), k.easing.clone()))
            })
            .collect();
        for track in &mut self.tracks {
            track.remove_at(end);
        }
        for (name, value, easing) in snapshot {
            for ms in [end, until] {
                let id = self.alloc_keyframe_id();
                let idx = self.track_index_or_create(&name);
                self.tracks[idx].insert(KeyframeProperty::new(
                    id,
                    ms,
                    name.clone(),
                    value.clone(),
                    easing.clone(),
                ));
            }
        }
        self.invalidate_property_cache();
    }

    /// Copy the keyframe pinned exactly at `from` (per track) to a new
    /// keyframe at `to` with the same value and easing. Interpolated
    /// mid-track values are not copyable; tracks without an exact hit are
    /// skipped.
    pub fn copy_keyframe(&mut self, to: u64, from: u64) {
        let copies: Vec<(String, PropertyValue, EasingMap)> = self
            .tracks
            .iter()
            .filter_map(|t| {
                t.at_millisecond(from)
                    .map(|k| (t.name.clone(), k.value.clone(), k.easing.clone()))
            })
            .collect();
        if copies.is_empty() {
            return;
        }
        for (name, value, easing) in copies {
            let id = self.alloc_keyframe_id();
            let idx = self.track_index_or_create(&name);
            self.tracks[idx].insert(KeyframeProperty::new(id, to, name, value, easing));
        }
        self.invalidate_property_cache();
    }

    /// Exact-hit query: is there a keyframe at `millisecond` on `track`
    /// (or on any track when `track` is `None`)?
    pub fn has_keyframe_at(&self, millisecond: u64, track: Option<&str>) -> bool {
        match track {
            Some(name) => self
                .track(name)
                .is_some_and(|t| t.at_millisecond(millisecond).is_some()),
            None => self
                .tracks
                .iter()
                .any(|t| t.at_millisecond(millisecond).is_some()),
        }
    }

    /// Rebuild the millisecond cache from scratch. Grouping, index sorting,
    /// and earlier-keyframe backfill all happen here; there is no
    /// incremental update path.
    pub fn invalidate_property_cache(&mut self) {
        let mut milliseconds: Vec<u64> = self
            .tracks
            .iter()
            .flat_map(|t| t.keyframes().iter().map(|k| k.millisecond))
            .collect();
        milliseconds.sort_unstable();
        milliseconds.dedup();

        self.cache = milliseconds
            .into_iter()
            .map(|ms| {
                let slots = self
                    .tracks
                    .iter()
                    .enumerate()
                    .filter_map(|(ti, track)| track.latest_at(ms).map(|ki| (ti, ki)))
                    .collect();
                CacheBucket {
                    millisecond: ms,
                    slots,
                }
            })
            .collect();
        debug!(
            "actor {:?}: rebuilt property cache ({} buckets)",
            self.id,
            self.cache.len()
        );
    }

    /// Resolve interpolated values at `millisecond` and set them as the live
    /// tween snapshot. A no-op outside `[start, end]`, and a no-op when the
    /// lookup lands before the first cache bucket.
    pub fn calculate_position(&mut self, millisecond: u64, interp: &dyn Interpolator) {
        if millisecond < self.start() || millisecond > self.end() {
            return;
        }
        let idx = self.cache.partition_point(|b| b.millisecond <= millisecond);
        if idx == 0 {
            return;
        }
        let bucket = &self.cache[idx - 1];
        let mut values = HashMap::with_capacity(bucket.slots.len());
        for &(ti, ki) in &bucket.slots {
            let track = &self.tracks[ti];
            let keyframe = &track.keyframes()[ki];
            let next = track.get(ki + 1);
            values.insert(
                track.name.clone(),
                keyframe.value_at(millisecond, next, interp),
            );
        }
        self.tween.set_values(values);
    }

    /// Number of cache buckets (derived state, exposed for invariant tests).
    #[inline]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Milliseconds of the cache index, ascending.
    pub fn cache_index(&self) -> Vec<u64> {
        self.cache.iter().map(|b| b.millisecond).collect()
    }

    pub(crate) fn reserve_keyframe_ids_through(&mut self, id: KeyframeId) {
        if id.0 >= self.next_keyframe {
            self.next_keyframe = id.0.wrapping_add(1);
        }
    }

    pub(crate) fn insert_raw(&mut self, keyframe: KeyframeProperty) {
        let name = keyframe.name.clone();
        let idx = self.track_index_or_create(&name);
        self.tracks[idx].insert(keyframe);
    }
}
