//! Stable serialization contract for timelines and actors.
//!
//! Exports round-trip the full authored state; derived caches and live
//! tween values are rebuilt on import, never serialized.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::easing::EasingMap;
use crate::ids::{ActorId, KeyframeId};
use crate::keyframe::KeyframeProperty;
use crate::value::PropertyValue;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeyframeExport {
    pub id: KeyframeId,
    pub millisecond: u64,
    pub name: String,
    pub value: PropertyValue,
    pub easing: EasingMap,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActorExport {
    pub start: u64,
    pub end: u64,
    pub track_names: Vec<String>,
    pub property_tracks: BTreeMap<String, Vec<KeyframeExport>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimelineExport {
    pub duration: u64,
    pub actor_order: Vec<ActorId>,
    pub actors: BTreeMap<ActorId, ActorExport>,
}

impl Actor {
    pub fn export(&self) -> ActorExport {
        let mut property_tracks = BTreeMap::new();
        for track in self.tracks() {
            let keyframes = track
                .keyframes()
                .iter()
                .map(|k| KeyframeExport {
                    id: k.id,
                    millisecond: k.millisecond,
                    name: k.name.clone(),
                    value: k.value.clone(),
                    easing: k.easing.clone(),
                })
                .collect();
            property_tracks.insert(track.name.clone(), keyframes);
        }
        ActorExport {
            start: self.start(),
            end: self.end(),
            track_names: self.track_names(),
            property_tracks,
        }
    }

    /// Rebuild an actor from an export. Track contents and keyframe ids are
    /// restored verbatim; the property cache is rebuilt from scratch.
    pub fn from_export(id: ActorId, export: &ActorExport) -> Self {
        let mut actor = Actor::new(id);
        // Recreate tracks in their exported first-keyframed order.
        for name in &export.track_names {
            let keyframes = match export.property_tracks.get(name) {
                Some(k) => k,
                None => continue,
            };
            for k in keyframes {
                actor.reserve_keyframe_ids_through(k.id);
                actor.insert_raw(KeyframeProperty::new(
                    k.id,
                    k.millisecond,
                    k.name.clone(),
                    k.value.clone(),
                    k.easing.clone(),
                ));
            }
        }
        actor.invalidate_property_cache();
        actor
    }
}
