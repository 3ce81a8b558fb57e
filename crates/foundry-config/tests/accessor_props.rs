use foundry_config::{accessor, view, Config, FieldPath};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn base() -> Config {
    Config::from_value(json!({
        "schemaVersion": "v1",
        "assetType": "weapon_item",
        "seed": 42,
        "item": {"category": "sword", "rarity": "common"},
        "form": {"length": 0.6, "ornamentation": 0.5},
        "tags": ["hero", "fantasy"]
    }))
    .unwrap()
}

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("item".to_string()),
        Just("form".to_string()),
        Just("seed".to_string()),
        Just("tags".to_string()),
        "[a-zA-Z_][a-zA-Z0-9_]{0,6}",
    ]
}

fn field_path() -> impl Strategy<Value = FieldPath> {
    prop::collection::vec(segment(), 1..5).prop_map(|segs| FieldPath::new(segs).unwrap())
}

fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
        Just(json!(["a", "b"])),
    ]
}

#[test]
fn test_set_then_get_on_empty() {
    let path: FieldPath = "output.resolution".parse().unwrap();
    let config = accessor::set(&Config::new(), &path, json!("512x512"));
    assert_eq!(config.get(&path), Some(&json!("512x512")));
    assert_eq!(config.leaf_paths(), vec![path]);
}

#[test]
fn test_set_str_empty_path_is_invalid() {
    assert!(accessor::set_str(&base(), "", json!(1)).is_err());
}

proptest! {
    #[test]
    fn prop_get_after_set_returns_value(path in field_path(), value in leaf_value()) {
        let updated = accessor::set(&base(), &path, value.clone());
        let fallback = json!("fallback");
        prop_assert_eq!(accessor::get_or(&updated, &path, &fallback), &value);
    }

    #[test]
    fn prop_set_never_mutates_input(path in field_path(), value in leaf_value()) {
        let original = base();
        let snapshot = original.clone();
        let _ = accessor::set(&original, &path, value);
        prop_assert_eq!(original, snapshot);
    }

    #[test]
    fn prop_set_leaves_disjoint_fields_alone(path in field_path(), value in leaf_value()) {
        let original = base();
        let updated = accessor::set(&original, &path, value);
        for leaf in original.leaf_paths() {
            let related = leaf.is_prefix_of(&path) || path.is_prefix_of(&leaf);
            if !related {
                prop_assert_eq!(updated.get(&leaf), original.get(&leaf));
            }
        }
    }

    #[test]
    fn prop_view_round_trips(path in field_path(), value in leaf_value()) {
        let updated = accessor::set(&base(), &path, value);
        let parsed = Config::from_json(&view::render(&updated)).unwrap();
        prop_assert_eq!(parsed, updated);
    }
}
