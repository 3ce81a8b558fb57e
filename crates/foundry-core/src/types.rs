//! Core types for Foundry
//!
//! Defines the session vocabulary shared by the store and its collaborators:
//! - Validation lifecycle state and generation tags
//! - Generation results and history records
//! - Responses from the defaults provider

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use foundry_config::{Config, Fingerprint};
use foundry_schema::{ValidationIssue, ValidationResult, Variant};

/// Lifecycle of the session's config with respect to validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationState {
    /// No variant loaded
    #[default]
    Empty,
    /// Stock config just loaded or restored
    Defaulted,
    /// Edited since the last validation
    Editing,
    /// A validation request is outstanding
    Validating,
    /// Last validation found no errors
    Valid,
    /// Last validation found errors
    Invalid,
}

impl ValidationState {
    /// All states, in lifecycle order
    pub const ALL: [Self; 6] = [
        Self::Empty,
        Self::Defaulted,
        Self::Editing,
        Self::Validating,
        Self::Valid,
        Self::Invalid,
    ];

    /// Stable lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Defaulted => "defaulted",
            Self::Editing => "editing",
            Self::Validating => "validating",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }

    /// Whether a validation outcome is settled for the current config
    #[inline]
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Valid | Self::Invalid)
    }
}

impl Display for ValidationState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monotonic tag identifying one revision of the session config
///
/// Bumped on every edit, switch, restore and reset. Async responses carry
/// the tag they were issued for and are dropped once it is no longer current.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value
    #[inline]
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// The following tag
    #[inline]
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub(crate) fn bump(&mut self) -> Self {
        *self = self.next();
        *self
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Unique history record identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Ulid);

impl RecordId {
    /// Generate new record ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

/// Where a generated asset landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDescriptor {
    /// Opaque locator (URL or storage key)
    pub locator: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Encoded size
    pub byte_size: u64,
    /// Encoding, e.g. `png`
    pub format: String,
    /// When the service finished
    pub created_at: DateTime<Utc>,
}

impl ResultDescriptor {
    /// Descriptor stamped with the current time
    #[must_use]
    pub fn new(locator: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            locator: locator.into(),
            width,
            height,
            byte_size: 0,
            format: "png".to_string(),
            created_at: Utc::now(),
        }
    }

    /// With encoded size
    #[inline]
    #[must_use]
    pub fn with_byte_size(mut self, byte_size: u64) -> Self {
        self.byte_size = byte_size;
        self
    }

    /// With encoding
    #[inline]
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

/// One generated asset with the exact config that produced it
///
/// Records are immutable once appended; the ledger assigns the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    id: RecordId,
    variant: Variant,
    config: Config,
    result: ResultDescriptor,
    created_at: DateTime<Utc>,
    sequence: u64,
    fingerprint: Fingerprint,
}

impl AssetRecord {
    pub(crate) fn new(
        sequence: u64,
        variant: Variant,
        config: Config,
        result: ResultDescriptor,
    ) -> Self {
        let fingerprint = config.fingerprint();
        Self {
            id: RecordId::new(),
            variant,
            config,
            result,
            created_at: Utc::now(),
            sequence,
            fingerprint,
        }
    }

    /// Record identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Variant the config belongs to
    #[inline]
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Config snapshot used for generation
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generated asset
    #[inline]
    #[must_use]
    pub fn result(&self) -> &ResultDescriptor {
        &self.result
    }

    /// When the record was appended
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Ledger position; larger is newer
    #[inline]
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Content hash of the canonical config
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

/// Answer of a defaults provider
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultsResponse {
    /// Stock config for the requested variant
    pub config: Config,
    /// Provider notes about the defaults
    pub warnings: Vec<ValidationIssue>,
}

impl DefaultsResponse {
    /// Response without warnings
    #[inline]
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            warnings: Vec::new(),
        }
    }
}

/// Most recent config that validated without errors
#[derive(Debug, Clone, PartialEq)]
pub struct LastKnownGood {
    /// Variant at the time
    pub variant: Variant,
    /// The validated config (normalized when the validator supplied a form)
    pub config: Config,
    /// The validation outcome
    pub result: ValidationResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generation_bump_is_monotonic() {
        let mut generation = Generation::default();
        let first = generation.bump();
        let second = generation.bump();
        assert!(second > first);
        assert_eq!(second.value(), 2);
        assert_eq!(second.to_string(), "g2");
    }

    #[test]
    fn record_id_parses_display() {
        let id = RecordId::new();
        let parsed: RecordId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-ulid".parse::<RecordId>().is_err());
    }

    #[test]
    fn state_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ValidationState::Validating).unwrap(),
            json!("validating")
        );
        assert!(ValidationState::Invalid.is_settled());
        assert!(!ValidationState::Editing.is_settled());
    }

    #[test]
    fn record_fingerprint_tracks_config() {
        let config = Config::from_value(json!({"assetType": "weapon_item", "seed": 9})).unwrap();
        let record = AssetRecord::new(
            3,
            Variant::WeaponItem,
            config.clone(),
            ResultDescriptor::new("mem://1", 512, 512),
        );
        assert_eq!(record.fingerprint(), config.fingerprint());
        assert_eq!(record.sequence(), 3);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["variant"], json!("weapon_item"));
        assert_eq!(value["result"]["byteSize"], json!(0));
    }
}
