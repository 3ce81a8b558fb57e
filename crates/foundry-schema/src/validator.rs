//! Config validation
//!
//! [`Validator`] is the boundary contract of the validation service.
//! [`SchemaValidator`] is the in-process implementation:
//!
//! 1. Structural checks against the variant's field registry
//! 2. Cross-field [`rules`](crate::rules) in declaration order
//! 3. Normalization of enum strings and numeric representations

use serde_json::{Map, Value};

use foundry_config::Config;

use crate::catalog::SCHEMA_VERSION;
use crate::field::FieldKind;
use crate::result::{ValidationIssue, ValidationResult};
use crate::rules::{self, Fact, Facts, Severity};
use crate::schema::{schema, Schema};
use crate::variant::Variant;

/// Validation service contract
///
/// A failure here means the service could not answer. It is never a
/// verdict on the config and must not be treated as success.
#[async_trait::async_trait]
pub trait Validator: Send + Sync {
    /// Validate one config snapshot
    async fn validate(&self, config: &Config) -> Result<ValidationResult, ValidationServiceError>;
}

/// Validation service failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationServiceError {
    /// The service could not be reached or did not answer
    #[error("validation service unavailable: {0}")]
    Unavailable(String),
}

/// In-process validator backed by the field registry
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

#[async_trait::async_trait]
impl Validator for SchemaValidator {
    async fn validate(&self, config: &Config) -> Result<ValidationResult, ValidationServiceError> {
        Ok(self.check(config))
    }
}

enum Node {
    Leaf,
    Group,
    Undeclared,
}

impl SchemaValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate synchronously
    #[must_use]
    pub fn check(&self, config: &Config) -> ValidationResult {
        let variant = match resolve_variant(config) {
            Ok(variant) => variant,
            Err(issue) => return ValidationResult::from_issues(vec![issue], Vec::new()),
        };
        if let Some(issue) = check_version(config) {
            return ValidationResult::from_issues(vec![issue], Vec::new());
        }

        let schema = schema(variant);
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut facts = Facts::default();
        let mut normalized = config.as_map().clone();

        for spec in schema.fields() {
            let path = spec.path();
            let Some(value) = lookup(config.as_map(), spec.segments()) else {
                errors.push(ValidationIssue::new(path, "missing required field"));
                continue;
            };
            match check_value(spec.kind(), value) {
                Ok((fact, replacement)) => {
                    if let Some(replacement) = replacement {
                        replace(&mut normalized, spec.segments(), replacement);
                    }
                    facts.record(path, fact);
                }
                Err(message) => errors.push(ValidationIssue::new(path, message)),
            }
        }

        find_undeclared(schema, config.as_map(), &mut Vec::new(), &mut errors);

        for rule in rules::rules_for(variant) {
            if let Some(issue) = rule.evaluate(&facts) {
                match rule.severity {
                    Severity::Error => errors.push(issue),
                    Severity::Warning => warnings.push(issue),
                }
            }
        }

        tracing::debug!(
            variant = %variant,
            errors = errors.len(),
            warnings = warnings.len(),
            "config checked"
        );

        let result = ValidationResult::from_issues(errors, warnings);
        if result.success && normalized != *config.as_map() {
            result.with_normalized(Config::from_map(normalized))
        } else {
            result
        }
    }
}

fn resolve_variant(config: &Config) -> Result<Variant, ValidationIssue> {
    let raw = config
        .as_map()
        .get("assetType")
        .ok_or_else(|| ValidationIssue::new("assetType", "missing required field: assetType"))?;
    let name = raw.as_str().map(|s| s.trim().to_ascii_lowercase());
    name.as_deref()
        .and_then(|name| Variant::ALL.into_iter().find(|v| v.as_str() == name))
        .ok_or_else(|| {
            ValidationIssue::new(
                "assetType",
                format!(
                    "invalid asset type: {raw}. Must be one of: {}",
                    Variant::ALL.map(Variant::as_str).join(", ")
                ),
            )
        })
}

fn check_version(config: &Config) -> Option<ValidationIssue> {
    let raw = config.as_map().get("schemaVersion")?;
    let supported = raw
        .as_str()
        .is_some_and(|v| v.trim().eq_ignore_ascii_case(SCHEMA_VERSION));
    (!supported).then(|| {
        ValidationIssue::new(
            "schemaVersion",
            format!("unsupported schema version: {raw}. Only '{SCHEMA_VERSION}' is supported"),
        )
    })
}

fn lookup<'a>(map: &'a Map<String, Value>, segments: &[&str]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = map.get(*first)?;
    for segment in rest {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

fn replace(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            if let Some(Value::Object(child)) = map.get_mut(*head) {
                replace(child, rest, value);
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check one value; on success returns its fact and, if its canonical form
/// differs, the replacement value
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn check_value(kind: FieldKind, value: &Value) -> Result<(Fact, Option<Value>), String> {
    match kind {
        FieldKind::Const(expected) => {
            let raw = value
                .as_str()
                .ok_or_else(|| format!("expected a string, got {}", json_kind(value)))?;
            let canonical = raw.trim().to_ascii_lowercase();
            if canonical != expected {
                return Err(format!("value must be exactly '{expected}'"));
            }
            let replacement = (canonical != raw).then(|| Value::from(canonical.clone()));
            Ok((Fact::Text(canonical), replacement))
        }
        FieldKind::Enum(members) => {
            let raw = value
                .as_str()
                .ok_or_else(|| format!("expected a string, got {}", json_kind(value)))?;
            let canonical = raw.trim().to_ascii_lowercase();
            if !members.contains(&canonical.as_str()) {
                return Err(format!(
                    "'{raw}' is not one of [{}]",
                    members.join(", ")
                ));
            }
            let replacement = (canonical != raw).then(|| Value::from(canonical.clone()));
            Ok((Fact::Text(canonical), replacement))
        }
        FieldKind::Float { min, max } => {
            let number = value
                .as_f64()
                .ok_or_else(|| format!("expected a number, got {}", json_kind(value)))?;
            check_range(number, min, max)?;
            let replacement = (!value.is_f64()).then(|| Value::from(number));
            Ok((Fact::Number(number), replacement))
        }
        FieldKind::Integer { min, max } => {
            let (whole, replacement) = if let Some(whole) = value.as_i64() {
                (whole, None)
            } else if value.is_u64() {
                return Err(format!("value must be <= {max}"));
            } else {
                let number = value
                    .as_f64()
                    .ok_or_else(|| format!("expected an integer, got {}", json_kind(value)))?;
                if number.fract() != 0.0 || number.abs() > i64::MAX as f64 {
                    return Err(format!("expected an integer, got {number}"));
                }
                let whole = number as i64;
                (whole, Some(Value::from(whole)))
            };
            check_range(whole as f64, min as f64, max as f64)?;
            Ok((Fact::Number(whole as f64), replacement))
        }
    }
}

fn check_range(value: f64, min: f64, max: f64) -> Result<(), String> {
    if value < min {
        Err(format!("value must be >= {min}"))
    } else if value > max {
        Err(format!("value must be <= {max}"))
    } else {
        Ok(())
    }
}

fn classify(schema: &Schema, segments: &[&str]) -> Node {
    let mut group = false;
    for spec in schema.fields() {
        let declared = spec.segments();
        if declared == segments {
            return Node::Leaf;
        }
        if declared.len() > segments.len() && declared[..segments.len()] == *segments {
            group = true;
        }
    }
    if group {
        Node::Group
    } else {
        Node::Undeclared
    }
}

fn find_undeclared<'a>(
    schema: &Schema,
    map: &'a Map<String, Value>,
    prefix: &mut Vec<&'a str>,
    errors: &mut Vec<ValidationIssue>,
) {
    for (key, value) in map {
        prefix.push(key.as_str());
        let path = prefix.join(".");
        match (classify(schema, prefix), value) {
            (Node::Leaf, _) => {}
            (Node::Group, Value::Object(child)) => find_undeclared(schema, child, prefix, errors),
            (Node::Group, other) => errors.push(ValidationIssue::new(
                path,
                format!("expected an object, got {}", json_kind(other)),
            )),
            (Node::Undeclared, _) => errors.push(ValidationIssue::new(
                path.clone(),
                format!("additional property not allowed: {path}"),
            )),
        }
        prefix.pop();
    }
}
