//! Validation outcomes
//!
//! Field problems are data, never errors: a [`ValidationResult`] carries
//! blocking errors and advisory warnings, each pinned to a field path.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use foundry_config::Config;

/// A problem found at one field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted path of the field
    pub path: String,
    /// Human-readable description
    pub message: String,
}

impl ValidationIssue {
    /// New issue at `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of validating one config snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// No errors were found
    pub success: bool,
    /// Blocking problems
    #[serde(default)]
    pub errors: Vec<ValidationIssue>,
    /// Advisory problems
    #[serde(default)]
    pub warnings: Vec<ValidationIssue>,
    /// Canonical form of the input, when it differs and validation succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_config: Option<Config>,
}

impl ValidationResult {
    /// Successful result with no findings
    #[must_use]
    pub fn valid() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Build from findings; success iff `errors` is empty
    #[must_use]
    pub fn from_issues(errors: Vec<ValidationIssue>, warnings: Vec<ValidationIssue>) -> Self {
        Self {
            success: errors.is_empty(),
            errors,
            warnings,
            normalized_config: None,
        }
    }

    /// Attach a normalized config
    #[must_use]
    pub fn with_normalized(mut self, config: Config) -> Self {
        self.normalized_config = Some(config);
        self
    }

    /// Whether generation may proceed
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.success && self.errors.is_empty()
    }

    /// Errors reported at `path`
    pub fn errors_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.errors.iter().filter(move |issue| issue.path == path)
    }

    /// Warnings reported at `path`
    pub fn warnings_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.warnings.iter().filter(move |issue| issue.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_from_issues_success_tracks_errors() {
        let ok = ValidationResult::from_issues(vec![], vec![ValidationIssue::new("a", "w")]);
        assert!(ok.is_valid());
        let failed = ValidationResult::from_issues(vec![ValidationIssue::new("a", "e")], vec![]);
        assert!(!failed.is_valid());
    }

    #[test]
    fn result_serializes_camel_case() {
        let normalized = Config::from_value(json!({"seed": 3})).unwrap();
        let result = ValidationResult::valid().with_normalized(normalized);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "errors": [], "warnings": [], "normalizedConfig": {"seed": 3}})
        );
    }

    #[test]
    fn result_omits_missing_normalized_config() {
        let value = serde_json::to_value(ValidationResult::valid()).unwrap();
        assert!(value.get("normalizedConfig").is_none());
        let back: ValidationResult =
            serde_json::from_value(json!({"success": false, "errors": [{"path": "seed", "message": "bad"}]}))
                .unwrap();
        assert_eq!(back.errors_at("seed").count(), 1);
        assert!(back.warnings.is_empty());
    }

    #[test]
    fn issue_display() {
        let issue = ValidationIssue::new("form.ornamentation", "too plain");
        assert_eq!(issue.to_string(), "form.ornamentation: too plain");
    }
}
