use std::collections::HashMap;

use polyscript::{data::deep_merge, DataMap, Value};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Boolean),
        any::<i64>().prop_map(Value::Integer),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::hash_map("[a-d]", inner, 0..4).prop_map(Value::Map),
        ]
    })
}

fn data_map() -> impl Strategy<Value = DataMap> {
    prop::collection::hash_map("[a-d]", value(), 0..5)
}

proptest! {
    #[test]
    fn merging_with_empty_is_identity(map in data_map()) {
        prop_assert_eq!(deep_merge(&map, &HashMap::new()), map.clone());
        prop_assert_eq!(deep_merge(&HashMap::new(), &map), map);
    }

    #[test]
    fn merging_twice_changes_nothing(base in data_map(), overlay in data_map()) {
        let once = deep_merge(&base, &overlay);
        let twice = deep_merge(&once, &overlay);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn overlay_keys_always_present(base in data_map(), overlay in data_map()) {
        let merged = deep_merge(&base, &overlay);
        for (key, incoming) in &overlay {
            match (base.get(key), incoming) {
                (Some(Value::Map(_)), Value::Map(_)) => {
                    prop_assert!(matches!(merged.get(key), Some(Value::Map(_))));
                }
                _ => {
                    prop_assert_eq!(merged.get(key), Some(incoming));
                }
            }
        }
        for key in base.keys() {
            prop_assert!(merged.contains_key(key));
        }
    }
}
