//! Path-addressed reads and writes over [`Config`] snapshots
//!
//! Reads never fail: a missing segment yields `None` (or the caller's
//! default). Writes return a new snapshot and auto-vivify missing
//! containers. A write that passes through an existing non-object value
//! replaces it with a fresh object and continues.

use serde_json::{Map, Value};

use crate::config::{json_kind, Config};
use crate::path::{FieldPath, PathError};

/// Value at `path`, if every segment resolves to an object member
#[must_use]
pub fn get<'a>(config: &'a Config, path: &FieldPath) -> Option<&'a Value> {
    let mut segments = path.iter();
    let first = segments.next()?;
    let mut current = config.as_map().get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Value at `path`, or `default` when any segment is absent
#[inline]
#[must_use]
pub fn get_or<'a>(config: &'a Config, path: &FieldPath, default: &'a Value) -> &'a Value {
    get(config, path).unwrap_or(default)
}

/// New config with `value` placed at `path`
///
/// The input is only read; untouched subtrees are cloned into the result.
#[must_use]
pub fn set(config: &Config, path: &FieldPath, value: Value) -> Config {
    let mut root = config.as_map().clone();
    write_into(&mut root, path.segments(), value, path);
    Config::from_map(root)
}

/// [`set`] addressed by a dotted string
///
/// # Errors
/// Returns [`PathError::Empty`] for a zero-length path
pub fn set_str(config: &Config, path: &str, value: Value) -> Result<Config, PathError> {
    let path: FieldPath = path.parse()?;
    Ok(set(config, &path, value))
}

fn write_into(map: &mut Map<String, Value>, segments: &[String], value: Value, full: &FieldPath) {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => return,
    };

    if rest.is_empty() {
        map.insert(head.clone(), value);
        return;
    }

    let slot = map
        .entry(head.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        tracing::debug!(
            path = %full,
            segment = %head,
            replaced = json_kind(slot),
            "overwriting non-container value to continue write"
        );
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(child) = slot {
        write_into(child, rest, value, full);
    }
}

/// Deep merge `overrides` onto `base`
///
/// Objects merge recursively; any other override value replaces the base
/// value outright (arrays included).
#[must_use]
pub fn merge(base: &Config, overrides: &Config) -> Config {
    let mut root = base.as_map().clone();
    merge_maps(&mut root, overrides.as_map());
    Config::from_map(root)
}

fn merge_maps(target: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, incoming) in overrides {
        match (target.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(nested)) => merge_maps(existing, nested),
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}

/// Every leaf path in document order
///
/// A leaf is any non-object value, or an empty object. Keys that cannot
/// form a path segment are skipped.
#[must_use]
pub fn leaf_paths(config: &Config) -> Vec<FieldPath> {
    let mut out = Vec::new();
    collect_leaves(config.as_map(), &mut Vec::new(), &mut out);
    out
}

fn collect_leaves(map: &Map<String, Value>, prefix: &mut Vec<String>, out: &mut Vec<FieldPath>) {
    for (key, value) in map {
        prefix.push(key.clone());
        match value {
            Value::Object(child) if !child.is_empty() => collect_leaves(child, prefix, out),
            _ => {
                if let Ok(path) = FieldPath::new(prefix.iter().cloned()) {
                    out.push(path);
                }
            }
        }
        prefix.pop();
    }
}
