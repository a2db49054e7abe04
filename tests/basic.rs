use jsonpatch_rs::{
    apply_patch, apply_reducer, compare, from_value, get_path, get_value_by_pointer, validate,
    AddOperation, ApplyOptions, PatchOperation,
};
use serde_json::json;

#[test]
fn parse_from_value() {
    let patch = from_value(json!([
        {"op": "add", "path": "/a/b", "value": 1},
        {"op": "remove", "path": "/c"},
    ]))
    .unwrap();
    assert_eq!(
        patch.0,
        vec![
            PatchOperation::Add(AddOperation {
                path: "/a/b".into(),
                value: json!(1),
            }),
            PatchOperation::Remove(jsonpatch_rs::RemoveOperation { path: "/c".into() }),
        ]
    );
}

#[test]
fn serialize_patch_round_trips() {
    let s = r#"[{"op":"add","path":"/a/b","value":1},{"op":"remove","path":"/c"}]"#;
    let patch = from_value(serde_json::from_str(s).unwrap()).unwrap();
    let serialized = serde_json::to_string(&patch.0).unwrap();
    assert_eq!(serialized, s);
}

#[test]
fn apply_patch_end_to_end() {
    let mut doc = json!([{ "name": "Andrew" }, { "name": "Maxim" }]);
    let patch = from_value(json!([
        { "op": "test", "path": "/0/name", "value": "Andrew" },
        { "op": "add", "path": "/0/happy", "value": true },
    ]))
    .unwrap();
    apply_patch(&mut doc, &patch, ApplyOptions::default()).unwrap();
    assert_eq!(
        doc,
        json!([{ "name": "Andrew", "happy": true }, { "name": "Maxim" }])
    );
}

#[test]
fn apply_reducer_folds_one_operation_without_mutating_input() {
    let doc = json!({"count": 1});
    let op = PatchOperation::Add(AddOperation {
        path: "/count".into(),
        value: json!(2),
    });
    let next = apply_reducer(&doc, &op, 0).unwrap();
    assert_eq!(next, json!({"count": 2}));
    assert_eq!(doc, json!({"count": 1}));
}

#[test]
fn compare_then_apply_round_trips() {
    let left = json!({
        "title": "Goodbye!",
        "author": { "givenName": "John", "familyName": "Doe" },
        "tags": ["example", "sample"],
        "content": "This will be unchanged",
    });
    let right = json!({
        "title": "Hello!",
        "author": { "givenName": "John" },
        "tags": ["example"],
        "content": "This will be unchanged",
        "phoneNumber": "+01-123-456-7890",
    });
    let patch = compare(&left, &right, false);
    let mut doc = left.clone();
    apply_patch(&mut doc, &patch, ApplyOptions::default()).unwrap();
    assert_eq!(doc, right);
}

#[test]
fn get_value_by_pointer_resolves_nested_paths() {
    let doc = json!({"a": {"b": [1, 2, 3]}});
    assert_eq!(get_value_by_pointer(&doc, "/a/b/2"), Some(&json!(3)));
    assert_eq!(get_value_by_pointer(&doc, "/a/missing"), None);
    assert_eq!(get_value_by_pointer(&doc, ""), Some(&doc));
}

#[test]
fn get_path_finds_nodes_by_identity() {
    let doc = json!({"a": {"b": [1, 2, 3]}});
    let node = &doc["a"]["b"][1];
    assert_eq!(get_path(&doc, node).unwrap(), "/a/b/1");
}

#[test]
fn validate_reports_first_unresolvable_operation() {
    let doc = json!({"a": 1});
    let sequence = json!([
        {"op": "test", "path": "/a", "value": 1},
        {"op": "remove", "path": "/missing"},
    ]);
    let err = validate(&sequence, Some(&doc)).unwrap();
    assert_eq!(err.kind.code(), "OPERATION_PATH_UNRESOLVABLE");
    assert_eq!(err.index, Some(1));
}

#[test]
fn validate_accepts_an_applicable_sequence() {
    let doc = json!({"a": 1});
    let sequence = json!([{"op": "add", "path": "/b", "value": 2}]);
    assert!(validate(&sequence, Some(&doc)).is_none());
}
