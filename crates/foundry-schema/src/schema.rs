//! Per-variant field registry
//!
//! [`schema`] returns the declared field set of a variant. The registry is
//! built once and shared; it is the runtime check that turns dynamic dot
//! paths into declared fields.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use foundry_config::{Config, FieldPath};

use crate::catalog;
use crate::field::FieldSpec;
use crate::variant::Variant;

/// Declared field set of one variant
#[derive(Debug, Clone)]
pub struct Schema {
    variant: Variant,
    fields: Vec<FieldSpec>,
}

static NPC_PORTRAIT: Lazy<Schema> = Lazy::new(|| Schema::build(Variant::NpcPortrait));
static WEAPON_ITEM: Lazy<Schema> = Lazy::new(|| Schema::build(Variant::WeaponItem));
static ENVIRONMENT_CONCEPT: Lazy<Schema> =
    Lazy::new(|| Schema::build(Variant::EnvironmentConcept));

/// Schema of `variant`
#[must_use]
pub fn schema(variant: Variant) -> &'static Schema {
    match variant {
        Variant::NpcPortrait => &NPC_PORTRAIT,
        Variant::WeaponItem => &WEAPON_ITEM,
        Variant::EnvironmentConcept => &ENVIRONMENT_CONCEPT,
    }
}

impl Schema {
    fn build(variant: Variant) -> Self {
        let fields = catalog::base_fields(variant)
            .into_iter()
            .chain(catalog::variant_fields(variant).iter().copied())
            .collect();
        Self { variant, fields }
    }

    /// Variant this schema describes
    #[inline]
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Declared leaves in declaration order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Declared leaf at `path`
    #[must_use]
    pub fn field(&self, path: &FieldPath) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.is_at(path))
    }

    /// Whether `path` is a declared leaf or a declared group
    #[must_use]
    pub fn declares(&self, path: &FieldPath) -> bool {
        self.fields.iter().any(|spec| spec.is_within(path))
    }

    /// Whether `path` is a declared group (an interior node)
    #[must_use]
    pub fn is_group(&self, path: &FieldPath) -> bool {
        self.declares(path) && self.field(path).is_none()
    }

    /// First leaf of `overrides` that is not a declared field
    ///
    /// An empty object counts as a leaf, so `{"item": {}}` reports `item`.
    #[must_use]
    pub fn first_undeclared_leaf(&self, overrides: &Config) -> Option<FieldPath> {
        overrides
            .leaf_paths()
            .into_iter()
            .find(|path| self.field(path).is_none())
    }

    /// Top-level groups in declaration order
    #[must_use]
    pub fn groups(&self) -> Vec<&'static str> {
        let mut groups: Vec<&'static str> = Vec::new();
        for group in self.fields.iter().filter_map(FieldSpec::group) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Stock config for this variant, using `seed` for the seed field
    #[must_use]
    pub fn default_config(&self, seed: u64) -> Config {
        let mut root = Map::new();
        for spec in &self.fields {
            insert(&mut root, spec.segments(), spec.default_json(seed));
        }
        Config::from_map(root)
    }
}

fn insert(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let slot = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = slot {
                insert(child, rest, value);
            }
        }
    }
}
