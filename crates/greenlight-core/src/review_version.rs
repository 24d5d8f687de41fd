//! Review-version normalization.
//!
//! The stored `reviewVersion` field accumulated many shapes over the life
//! of the product: absent, a bare number, a label string, or an object
//! wrapping the real value under one of several keys. [`ReviewVersion::normalize`]
//! coerces all of them into the canonical three-value enum and is total —
//! every input maps to a version, nothing panics.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Canonical review workflow version.
///
/// Stored as `"1" | "2" | "3"`; displayed as `Legacy | 2.0 | Brief`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReviewVersion {
    #[default]
    Legacy,
    V2,
    Brief,
}

/// Object keys that may wrap the real value, in priority order.
const WRAPPER_KEYS: [&str; 6] = [
    "reviewVersion",
    "reviewType",
    "type",
    "version",
    "value",
    "label",
];

impl ReviewVersion {
    /// Stored string form (`"1" | "2" | "3"`).
    #[must_use]
    pub const fn stored(self) -> &'static str {
        match self {
            Self::Legacy => "1",
            Self::V2 => "2",
            Self::Brief => "3",
        }
    }

    /// Display label (`Legacy | 2.0 | Brief`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Legacy => "Legacy",
            Self::V2 => "2.0",
            Self::Brief => "Brief",
        }
    }

    /// Coerce any stored value into a canonical version.
    ///
    /// Objects are unwrapped through [`WRAPPER_KEYS`] exactly once; a
    /// wrapper nested inside a wrapper falls back to `Legacy`. Unrecognized
    /// values of any shape fall back to `Legacy`.
    #[must_use]
    pub fn normalize(value: &Value) -> Self {
        Self::normalize_at(value, 0)
    }

    fn normalize_at(value: &Value, depth: u8) -> Self {
        match value {
            Value::Number(n) => Self::from_number(n),
            Value::String(s) => Self::from_text(s),
            Value::Object(map) if depth == 0 => WRAPPER_KEYS
                .iter()
                .find_map(|key| map.get(*key))
                .map_or(Self::Legacy, |inner| Self::normalize_at(inner, 1)),
            // Null, bools, arrays, and nested wrappers all fall back.
            _ => Self::Legacy,
        }
    }

    fn from_number(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            return match i {
                2 => Self::V2,
                3 => Self::Brief,
                _ => Self::Legacy,
            };
        }
        match n.as_f64() {
            Some(f) if (f - 2.0).abs() < f64::EPSILON => Self::V2,
            Some(f) if (f - 3.0).abs() < f64::EPSILON => Self::Brief,
            _ => Self::Legacy,
        }
    }

    fn from_text(raw: &str) -> Self {
        let text = raw.trim().to_ascii_lowercase();
        // "legacy" wins over everything, so "legacy v2" stays Legacy.
        if text.contains("legacy") {
            Self::Legacy
        } else if text == "2" || text.contains("2.0") || text.contains("v2") {
            Self::V2
        } else if text == "3" || text.contains("3.0") || text.contains("v3") || text.contains("brief")
        {
            Self::Brief
        } else {
            Self::Legacy
        }
    }
}

impl fmt::Display for ReviewVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stored())
    }
}

impl Serialize for ReviewVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.stored())
    }
}

impl<'de> Deserialize<'de> for ReviewVersion {
    /// Deserialization is lenient by design: any legacy shape normalizes,
    /// nothing fails.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::normalize(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::ReviewVersion;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    #[test]
    fn absent_and_null_default_to_legacy() {
        assert_eq!(ReviewVersion::normalize(&Value::Null), ReviewVersion::Legacy);
    }

    #[test]
    fn numbers_map_by_value() {
        assert_eq!(ReviewVersion::normalize(&json!(1)), ReviewVersion::Legacy);
        assert_eq!(ReviewVersion::normalize(&json!(2)), ReviewVersion::V2);
        assert_eq!(ReviewVersion::normalize(&json!(3)), ReviewVersion::Brief);
        assert_eq!(ReviewVersion::normalize(&json!(2.0)), ReviewVersion::V2);
        assert_eq!(ReviewVersion::normalize(&json!(42)), ReviewVersion::Legacy);
    }

    #[test]
    fn strings_match_case_insensitive_substrings() {
        assert_eq!(
            ReviewVersion::normalize(&json!("Legacy review")),
            ReviewVersion::Legacy
        );
        assert_eq!(ReviewVersion::normalize(&json!("2")), ReviewVersion::V2);
        assert_eq!(
            ReviewVersion::normalize(&json!("workflow 2.0")),
            ReviewVersion::V2
        );
        assert_eq!(ReviewVersion::normalize(&json!("V2")), ReviewVersion::V2);
        assert_eq!(ReviewVersion::normalize(&json!("3")), ReviewVersion::Brief);
        assert_eq!(
            ReviewVersion::normalize(&json!("Brief-based")),
            ReviewVersion::Brief
        );
        assert_eq!(
            ReviewVersion::normalize(&json!("V3 brief")),
            ReviewVersion::Brief
        );
        assert_eq!(
            ReviewVersion::normalize(&json!("unrecognized")),
            ReviewVersion::Legacy
        );
    }

    #[test]
    fn legacy_substring_wins_over_version_markers() {
        assert_eq!(
            ReviewVersion::normalize(&json!("legacy v2")),
            ReviewVersion::Legacy
        );
    }

    #[test]
    fn wrapper_objects_unwrap_by_key_priority() {
        assert_eq!(
            ReviewVersion::normalize(&json!({"label": "Brief"})),
            ReviewVersion::Brief
        );
        // reviewVersion outranks label.
        assert_eq!(
            ReviewVersion::normalize(&json!({"label": "Brief", "reviewVersion": 2})),
            ReviewVersion::V2
        );
        assert_eq!(
            ReviewVersion::normalize(&json!({"type": "v3"})),
            ReviewVersion::Brief
        );
        assert_eq!(
            ReviewVersion::normalize(&json!({"unrelated": "v3"})),
            ReviewVersion::Legacy
        );
    }

    #[test]
    fn wrappers_unwrap_only_one_level() {
        assert_eq!(
            ReviewVersion::normalize(&json!({"value": {"label": "brief"}})),
            ReviewVersion::Legacy
        );
    }

    #[test]
    fn serde_roundtrips_through_stored_form() {
        let rendered = serde_json::to_string(&ReviewVersion::Brief).unwrap();
        assert_eq!(rendered, "\"3\"");
        let parsed: ReviewVersion = serde_json::from_str("\"v2\"").unwrap();
        assert_eq!(parsed, ReviewVersion::V2);
        // Unknown shapes still deserialize (to Legacy) instead of failing.
        let parsed: ReviewVersion = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(parsed, ReviewVersion::Legacy);
    }

    #[test]
    fn labels_match_stored_values() {
        assert_eq!(ReviewVersion::Legacy.label(), "Legacy");
        assert_eq!(ReviewVersion::V2.label(), "2.0");
        assert_eq!(ReviewVersion::Brief.label(), "Brief");
        assert_eq!(ReviewVersion::Brief.stored(), "3");
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            any::<f64>().prop_map(|f| serde_json::Number::from_f64(f)
                .map_or(Value::Null, Value::Number)),
            any::<String>().prop_map(Value::String),
        ];
        let key = prop_oneof![
            Just(String::from("reviewVersion")),
            Just(String::from("label")),
            Just(String::from("value")),
            any::<String>(),
        ];
        leaf.prop_recursive(3, 24, 4, move |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map(key.clone(), inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        // Totality: every JSON shape normalizes to exactly one version.
        #[test]
        fn normalize_is_total(value in arb_json()) {
            let version = ReviewVersion::normalize(&value);
            prop_assert!(matches!(
                version,
                ReviewVersion::Legacy | ReviewVersion::V2 | ReviewVersion::Brief
            ));
        }
    }
}
