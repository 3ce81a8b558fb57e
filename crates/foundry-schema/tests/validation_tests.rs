use foundry_config::{Config, FieldPath};
use foundry_schema::{rules, schema, FieldKind, SchemaValidator, Variant};
use proptest::prelude::*;
use serde_json::{json, Value};

fn variant() -> impl Strategy<Value = Variant> {
    prop_oneof![
        Just(Variant::NpcPortrait),
        Just(Variant::WeaponItem),
        Just(Variant::EnvironmentConcept),
    ]
}

fn with(config: &Config, path: &str, value: Value) -> Config {
    config.with_str(path, value).unwrap()
}

#[test]
fn test_rule_paths_are_declared_fields() {
    for variant in Variant::ALL {
        let schema = schema(variant);
        for rule in rules::rules_for(variant) {
            assert!(
                rule.path.parse::<FieldPath>().ok().and_then(|path| schema.field(&path)).is_some(),
                "{} reports at undeclared {}",
                rule.id,
                rule.path
            );
        }
    }
}

#[test]
fn test_npc_young_with_beard_warns() {
    let config = schema(Variant::NpcPortrait).default_config(5);
    let config = with(&config, "identity.ageRange", json!("young"));
    let config = with(&config, "facialFeatures.facialHair", json!("beard"));
    let result = SchemaValidator::new().check(&config);
    assert!(result.success);
    assert_eq!(result.warnings_at("facialFeatures.facialHair").count(), 1);
}

#[test]
fn test_environment_fields_rejected_on_weapon() {
    let weapon = schema(Variant::WeaponItem).default_config(5);
    let config = with(&weapon, "scene.biome", json!("arctic"));
    let result = SchemaValidator::new().check(&config);
    assert!(!result.success);
    assert_eq!(result.errors_at("scene").count(), 1);
}

proptest! {
    #[test]
    fn prop_any_enum_member_accepted(variant in variant(), pick in any::<prop::sample::Index>()) {
        let schema = schema(variant);
        let enums: Vec<_> = schema
            .fields()
            .iter()
            .filter_map(|spec| match spec.kind() {
                FieldKind::Enum(members) => Some((spec.path(), members)),
                _ => None,
            })
            .collect();
        let (path, members) = &enums[pick.index(enums.len())];
        let member = members[pick.index(members.len())];

        let config = with(&schema.default_config(77), path, json!(member));
        let result = SchemaValidator::new().check(&config);
        prop_assert_eq!(result.errors_at(path).count(), 0);
    }

    #[test]
    fn prop_out_of_range_float_is_error(variant in variant(), pick in any::<prop::sample::Index>(), excess in 0.001f64..10.0) {
        let schema = schema(variant);
        let floats: Vec<_> = schema
            .fields()
            .iter()
            .filter_map(|spec| match spec.kind() {
                FieldKind::Float { max, .. } => Some((spec.path(), max)),
                _ => None,
            })
            .collect();
        let (path, max) = &floats[pick.index(floats.len())];

        let config = with(&schema.default_config(77), path, json!(max + excess));
        let result = SchemaValidator::new().check(&config);
        prop_assert!(!result.success);
        prop_assert_eq!(result.errors_at(path).count(), 1);
    }

    #[test]
    fn prop_common_ornamentation_never_errors(ornamentation in 0.0f64..=1.0) {
        let weapon = schema(Variant::WeaponItem).default_config(3);
        let config = with(&weapon, "form.ornamentation", json!(ornamentation));
        let result = SchemaValidator::new().check(&config);
        prop_assert!(result.success);
        prop_assert_eq!(result.warnings_at("form.ornamentation").count(), usize::from(ornamentation > 0.6));
    }

    #[test]
    fn prop_seed_in_range_accepted(seed in 1i64..=999_999_999) {
        let config = with(&schema(Variant::NpcPortrait).default_config(1), "seed", json!(seed));
        prop_assert!(SchemaValidator::new().check(&config).success);
    }
}
