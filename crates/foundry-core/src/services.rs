//! Collaborator boundaries
//!
//! The store talks to the outside world only through these traits. Each has a
//! local implementation so a session works offline; remote backends plug in
//! behind the same seams.

use rand::Rng;

use foundry_config::Config;
use foundry_schema::catalog::{SEED_MAX, SEED_MIN};
use foundry_schema::{schema, Variant};

use crate::error::ServiceError;
use crate::types::{AssetRecord, DefaultsResponse, RecordId, ResultDescriptor};

/// Source of stock configs
#[async_trait::async_trait]
pub trait DefaultsProvider: Send + Sync {
    /// Stock config for `variant`
    ///
    /// Fails with [`ServiceError::NotFound`] if the provider has no schema
    /// for it.
    async fn request_defaults(&self, variant: Variant) -> Result<DefaultsResponse, ServiceError>;
}

/// Asset generation backend
#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate an asset from a validated config
    async fn request_generation(&self, config: &Config) -> Result<ResultDescriptor, ServiceError>;
}

/// Persistence behind the history ledger
#[async_trait::async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Every stored record, in any order
    async fn list(&self) -> Result<Vec<AssetRecord>, ServiceError>;

    /// Store one record
    async fn append(&self, record: &AssetRecord) -> Result<(), ServiceError>;

    /// Drop a record; `false` if it was not stored
    async fn remove(&self, id: RecordId) -> Result<bool, ServiceError>;
}

/// How [`SchemaDefaults`] picks the seed of a fresh config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Always the same seed, so defaults are reproducible
    Fixed(u64),
    /// A fresh seed in the schema's range on every request
    Random,
}

impl SeedPolicy {
    /// Seed for the next config
    #[must_use]
    pub fn next_seed(self) -> u64 {
        match self {
            Self::Fixed(seed) => seed,
            Self::Random => {
                rand::rng().random_range(SEED_MIN.unsigned_abs()..=SEED_MAX.unsigned_abs())
            }
        }
    }
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self::Fixed(42)
    }
}

/// Defaults built from the local field registry
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaDefaults {
    seed: SeedPolicy,
}

impl SchemaDefaults {
    /// Create with the default seed policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With seed policy
    #[inline]
    #[must_use]
    pub fn with_seed_policy(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }

    /// Stock config for `variant`, without going through the async seam
    #[must_use]
    pub fn defaults_for(&self, variant: Variant) -> Config {
        schema(variant).default_config(self.seed.next_seed())
    }
}

#[async_trait::async_trait]
impl DefaultsProvider for SchemaDefaults {
    async fn request_defaults(&self, variant: Variant) -> Result<DefaultsResponse, ServiceError> {
        Ok(DefaultsResponse::new(self.defaults_for(variant)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_config::FieldPath;

    #[test]
    fn fixed_seed_is_stable() {
        let defaults = SchemaDefaults::new();
        let a = defaults.defaults_for(Variant::NpcPortrait);
        let b = defaults.defaults_for(Variant::NpcPortrait);
        assert_eq!(a, b);
        assert_eq!(a.get(&FieldPath::single("seed").unwrap()), Some(&serde_json::json!(42)));
    }

    #[test]
    fn random_seed_in_range() {
        for _ in 0..32 {
            let seed = SeedPolicy::Random.next_seed();
            assert!((1..=999_999_999).contains(&seed));
        }
    }

    #[tokio::test]
    async fn schema_defaults_answer_every_variant() {
        let defaults = SchemaDefaults::new().with_seed_policy(SeedPolicy::Fixed(7));
        for variant in Variant::ALL {
            let response = defaults.request_defaults(variant).await.unwrap();
            assert!(response.warnings.is_empty());
            assert_eq!(
                response.config.get_str(&FieldPath::single("assetType").unwrap()),
                Some(variant.as_str())
            );
        }
    }
}
