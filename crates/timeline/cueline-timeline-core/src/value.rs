//! Property values carried by keyframes and produced by interpolation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
    Composite,
}

/// A keyframed value: a scalar number, a step-only string, or a composite of
/// named numeric sub-fields (e.g. `{x, y}` for a position track).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum PropertyValue {
    Number(f64),
    /// Step-only text value (no blending).
    Text(String),
    /// Named numeric sub-fields; each sub-field eases independently.
    Composite(BTreeMap<String, f64>),
}

/// Field slot used for non-composite values in per-field easing maps.
pub const SCALAR_FIELD: &str = "value";

impl PropertyValue {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Number(_) => ValueKind::Number,
            PropertyValue::Text(_) => ValueKind::Text,
            PropertyValue::Composite(_) => ValueKind::Composite,
        }
    }

    /// Sub-field names participating in easing normalization. Scalar and
    /// text values expose the single conventional slot.
    pub fn field_names(&self) -> Vec<String> {
        match self {
            PropertyValue::Composite(fields) => fields.keys().cloned().collect(),
            _ => vec![SCALAR_FIELD.to_string()],
        }
    }

    pub fn composite<N, I>(fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, f64)>,
    {
        PropertyValue::Composite(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_for_each_kind() {
        assert_eq!(PropertyValue::Number(1.0).field_names(), vec!["value"]);
        let composite = PropertyValue::composite([("x", 0.0), ("y", 1.0)]);
        assert_eq!(composite.field_names(), vec!["x", "y"]);
    }

    #[test]
    fn serde_round_trip() {
        let v = PropertyValue::composite([("x", 2.5)]);
        let json = serde_json::to_string(&v).unwrap();
        let back: PropertyValue = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
