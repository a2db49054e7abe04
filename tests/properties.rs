use jsonpatch_rs::{apply_patch, compare, deep_clone, escape_path_component, unescape_path_component, ApplyOptions};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| Value::from(n)),
        "[a-z]{0,8}".prop_map(Value::String),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 64, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4).prop_map(|pairs| {
                let mut map = Map::new();
                for (k, v) in pairs {
                    map.insert(k, v);
                }
                Value::Object(map)
            }),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn round_trip_diff_turns_a_into_b(a in arb_json(), b in arb_json()) {
        let patch = compare(&a, &b, false);
        let mut doc = deep_clone(&a);
        apply_patch(&mut doc, &patch, ApplyOptions::default()).unwrap();
        prop_assert_eq!(doc, b);
    }

    #[test]
    fn invertible_diff_also_turns_a_into_b_and_its_tests_pass(a in arb_json(), b in arb_json()) {
        let patch = compare(&a, &b, true);
        let mut doc = deep_clone(&a);
        apply_patch(&mut doc, &patch, ApplyOptions::default()).unwrap();
        prop_assert_eq!(doc, b);
    }

    #[test]
    fn diffing_a_value_against_itself_is_empty(a in arb_json()) {
        let b = a.clone();
        let patch = compare(&a, &b, false);
        prop_assert!(patch.0.is_empty());
    }

    #[test]
    fn pointer_token_escaping_round_trips(s in "[^\\x00]{0,16}") {
        prop_assert_eq!(unescape_path_component(&escape_path_component(&s)), s);
    }
}
