//! Easing specifications and the interpolation collaborator seam.
//!
//! Authors supply easing either as a single curve name or as a per-field
//! map. Both normalize into a dense `EasingMap` covering every sub-field of
//! the keyframed value, with missing fields defaulting to `"linear"`.
//! Interpolation itself sits behind the `Interpolator` trait; the engine
//! only ever calls `interpolate(from, to, fraction, easing)`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::PropertyValue;

/// Curve applied when a field has no explicit easing entry.
pub const DEFAULT_EASING: &str = "linear";

/// User-facing easing argument for keyframe authoring.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EasingSpec {
    /// One curve name applied uniformly to every sub-field.
    Curve(String),
    /// Explicit per-field curve names; missing fields fall back to linear.
    PerField(BTreeMap<String, String>),
}

impl From<&str> for EasingSpec {
    fn from(name: &str) -> Self {
        EasingSpec::Curve(name.to_string())
    }
}

/// Dense field -> curve-name map, normalized against a concrete value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EasingMap(pub BTreeMap<String, String>);

impl EasingMap {
    /// Expand a spec across every sub-field of `value`. A single curve name
    /// is applied uniformly; a partial map is backfilled with the default.
    pub fn normalize(spec: Option<&EasingSpec>, value: &PropertyValue) -> Self {
        let mut map = BTreeMap::new();
        for field in value.field_names() {
            let curve = match spec {
                Some(EasingSpec::Curve(name)) => name.clone(),
                Some(EasingSpec::PerField(fields)) => fields
                    .get(&field)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_EASING.to_string()),
                None => DEFAULT_EASING.to_string(),
            };
            map.insert(field, curve);
        }
        EasingMap(map)
    }

    #[inline]
    pub fn curve_for(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or(DEFAULT_EASING)
    }
}

/// Pure interpolation collaborator: deterministic, no side effects.
/// Called only when tweening a keyframe toward its successor.
pub trait Interpolator {
    fn interpolate(
        &self,
        from: &PropertyValue,
        to: &PropertyValue,
        fraction: f64,
        easing: &EasingMap,
    ) -> PropertyValue;
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn curve_apply(name: &str, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    match name {
        "linear" => t,
        "easeInQuad" => t * t,
        "easeOutQuad" => t * (2.0 - t),
        "easeInOutQuad" => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        "easeInCubic" => t * t * t,
        "easeOutCubic" => {
            let u = t - 1.0;
            u * u * u + 1.0
        }
        // Unknown curve names fall back to linear.
        _ => t,
    }
}

/// Default `Interpolator` over the built-in named curves.
///
/// Numbers and composite fields ease independently per the easing map; text
/// holds the left value (step). Mismatched kinds fail soft to the left
/// value rather than erroring mid-frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurveInterpolator;

impl Interpolator for CurveInterpolator {
    fn interpolate(
        &self,
        from: &PropertyValue,
        to: &PropertyValue,
        fraction: f64,
        easing: &EasingMap,
    ) -> PropertyValue {
        match (from, to) {
            (PropertyValue::Number(a), PropertyValue::Number(b)) => {
                let eased = curve_apply(easing.curve_for(crate::value::SCALAR_FIELD), fraction);
                PropertyValue::Number(lerp(*a, *b, eased))
            }
            (PropertyValue::Composite(a), PropertyValue::Composite(b)) => {
                let mut out = BTreeMap::new();
                for (field, av) in a {
                    let bv = b.get(field).copied().unwrap_or(*av);
                    let eased = curve_apply(easing.curve_for(field), fraction);
                    out.insert(field.clone(), lerp(*av, bv, eased));
                }
                PropertyValue::Composite(out)
            }
            (PropertyValue::Text(_), _) => from.clone(),
            _ => from.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_expands_uniform_curve_over_composite_fields() {
        let value = PropertyValue::composite([("x", 0.0), ("y", 0.0)]);
        let map = EasingMap::normalize(Some(&"easeInQuad".into()), &value);
        assert_eq!(map.curve_for("x"), "easeInQuad");
        assert_eq!(map.curve_for("y"), "easeInQuad");
    }

    #[test]
    fn normalize_backfills_missing_fields_with_linear() {
        let value = PropertyValue::composite([("x", 0.0), ("y", 0.0)]);
        let mut fields = BTreeMap::new();
        fields.insert("x".to_string(), "easeOutCubic".to_string());
        let map = EasingMap::normalize(Some(&EasingSpec::PerField(fields)), &value);
        assert_eq!(map.curve_for("x"), "easeOutCubic");
        assert_eq!(map.curve_for("y"), DEFAULT_EASING);
    }

    #[test]
    fn linear_midpoint() {
        let interp = CurveInterpolator;
        let easing = EasingMap::normalize(None, &PropertyValue::Number(0.0));
        let v = interp.interpolate(
            &PropertyValue::Number(0.0),
            &PropertyValue::Number(100.0),
            0.5,
            &easing,
        );
        assert_eq!(v, PropertyValue::Number(50.0));
    }

    #[test]
    fn text_steps_and_mismatch_falls_back_to_left() {
        let interp = CurveInterpolator;
        let easing = EasingMap::default();
        let text = interp.interpolate(
            &PropertyValue::Text("a".into()),
            &PropertyValue::Text("b".into()),
            0.9,
            &easing,
        );
        assert_eq!(text, PropertyValue::Text("a".into()));
        let mixed = interp.interpolate(
            &PropertyValue::Number(1.0),
            &PropertyValue::Text("b".into()),
            0.5,
            &easing,
        );
        assert_eq!(mixed, PropertyValue::Number(1.0));
    }

    #[test]
    fn unknown_curve_name_is_linear() {
        assert_eq!(curve_apply("swing", 0.25), 0.25);
    }
}
