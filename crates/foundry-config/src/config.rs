//! Immutable configuration snapshots
//!
//! [`Config`] is a JSON object (insertion-ordered) holding one asset
//! configuration. Every mutation goes through [`crate::accessor`] and
//! produces a new snapshot; a `Config` value is never edited in place.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::accessor;
use crate::hash::Fingerprint;
use crate::path::{FieldPath, PathError};

/// A configuration snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
    /// Empty config
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON object
    #[inline]
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value, which must be an object
    ///
    /// # Errors
    /// Returns [`ConfigError::NotAnObject`] for any other JSON value
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConfigError::NotAnObject(json_kind(&other))),
        }
    }

    /// Parse from a JSON document
    ///
    /// # Errors
    /// Returns error if the JSON is invalid or not an object
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json).map_err(ConfigError::InvalidJson)?;
        Self::from_value(value)
    }

    /// Parse from a YAML document
    ///
    /// # Errors
    /// Returns error if the YAML is invalid or not a mapping
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_yaml::from_str(yaml).map_err(ConfigError::InvalidYaml)?;
        Self::from_value(value)
    }

    /// Top-level mapping
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwrap into a JSON value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Clone out as a JSON value
    #[inline]
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Whether the config has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `path`, if every segment resolves
    #[inline]
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        accessor::get(self, path)
    }

    /// Value at `path`, or `default` when any segment is absent
    #[inline]
    #[must_use]
    pub fn get_or<'a>(&'a self, path: &FieldPath, default: &'a Value) -> &'a Value {
        accessor::get_or(self, path, default)
    }

    /// String value at `path`
    #[inline]
    #[must_use]
    pub fn get_str(&self, path: &FieldPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Numeric value at `path`
    #[inline]
    #[must_use]
    pub fn get_f64(&self, path: &FieldPath) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }

    /// Whether `path` resolves to a value
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &FieldPath) -> bool {
        self.get(path).is_some()
    }

    /// New snapshot with `value` placed at `path`
    #[inline]
    #[must_use]
    pub fn with(&self, path: &FieldPath, value: Value) -> Self {
        accessor::set(self, path, value)
    }

    /// New snapshot with `value` placed at a dotted path
    ///
    /// # Errors
    /// Returns [`PathError::Empty`] for `""` and other path errors for malformed input
    pub fn with_str(&self, path: &str, value: Value) -> Result<Self, PathError> {
        accessor::set_str(self, path, value)
    }

    /// Every leaf path, in document order
    #[inline]
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<FieldPath> {
        accessor::leaf_paths(self)
    }

    /// Canonical JSON (sorted keys, no whitespace)
    #[must_use]
    pub fn to_canonical_json(&self) -> String {
        canonical_json(&Value::Object(self.0.clone()))
    }

    /// Fingerprint of the canonical form
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(self.to_canonical_json().as_bytes())
    }
}

impl From<Map<String, Value>> for Config {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Config {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Config> for Value {
    fn from(config: Config) -> Self {
        config.into_value()
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[source] serde_yaml::Error),

    #[error("config must be an object, got {0}")]
    NotAnObject(&'static str),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Generate canonical JSON (sorted keys)
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();

            let parts: Vec<String> = keys
                .into_iter()
                .filter_map(|key| {
                    map.get(key)
                        .map(|val| format!("{}:{}", Value::String(key.clone()), canonical_json(val)))
                })
                .collect();
            format!("{{{}}}", parts.join(","))
        }
        Value::Array(arr) => {
            let parts: Vec<_> = arr.iter().map(canonical_json).collect();
            format!("[{}]", parts.join(","))
        }
        // Display for scalars is already compact JSON, with strings escaped
        scalar => scalar.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    #[test]
    fn config_from_json() {
        let config = Config::from_json(r#"{"item": {"rarity": "rare"}, "seed": 7}"#).unwrap();
        assert_eq!(config.get_str(&path("item.rarity")), Some("rare"));
        assert_eq!(config.get(&path("seed")), Some(&json!(7)));
    }

    #[test]
    fn config_from_json_rejects_non_object() {
        assert!(matches!(
            Config::from_json("[1, 2]"),
            Err(ConfigError::NotAnObject("array"))
        ));
        assert!(matches!(
            Config::from_json("not json"),
            Err(ConfigError::InvalidJson(_))
        ));
    }

    #[test]
    fn config_from_yaml() {
        let config = Config::from_yaml("form:\n  length: 0.6\n").unwrap();
        assert_eq!(config.get_f64(&path("form.length")), Some(0.6));
    }

    #[test]
    fn config_canonical_fingerprint_ignores_key_order() {
        let a = Config::from_json(r#"{"b": 1, "a": {"y": 2, "x": 3}}"#).unwrap();
        let b = Config::from_json(r#"{"a": {"x": 3, "y": 2}, "b": 1}"#).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.to_canonical_json(), r#"{"a":{"x":3,"y":2},"b":1}"#);
    }

    #[test]
    fn config_canonical_json_escapes_strings() {
        let config = Config::from_value(json!({"note": "say \"hi\""})).unwrap();
        assert_eq!(config.to_canonical_json(), r#"{"note":"say \"hi\""}"#);
    }

    #[test]
    fn config_with_leaves_original_untouched() {
        let original = Config::from_value(json!({"form": {"length": 0.6}})).unwrap();
        let updated = original.with(&path("form.length"), json!(0.9));
        assert_eq!(original.get_f64(&path("form.length")), Some(0.6));
        assert_eq!(updated.get_f64(&path("form.length")), Some(0.9));
    }

    #[test]
    fn config_preserves_insertion_order() {
        let config = Config::from_json(r#"{"zeta": 1, "alpha": 2}"#).unwrap();
        let keys: Vec<_> = config.as_map().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
