//! Structural diff: generate a [`Patch`](crate::patch::Patch) that turns one document into
//! another.
//!
//! The walk is a plain recursive comparison rather than a delegate/visitor pair — there is only
//! one pass shape to express (reverse-iterate removals and replacements, then forward-iterate
//! additions), so a visitor seam buys nothing here that a direct recursive function doesn't
//! already give for free.

use serde_json::Value;

use crate::patch::{AddOperation, Patch, PatchOperation, RemoveOperation, ReplaceOperation, TestOperation};
use crate::pointer;
use crate::value::are_equal;

fn same_container_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_))
    )
}

fn child_path(path: &str, token: &str) -> String {
    format!("{path}/{}", pointer::escape_token(token))
}

fn push_test_then(ops: &mut Vec<PatchOperation>, invertible: bool, path: &str, old_value: &Value, then: PatchOperation) {
    if invertible {
        ops.push(PatchOperation::Test(TestOperation {
            path: path.to_string(),
            value: old_value.clone(),
        }));
    }
    ops.push(then);
}

fn diff_scalar_or_mismatch(old: &Value, new: &Value, path: &str, invertible: bool, ops: &mut Vec<PatchOperation>) {
    if are_equal(old, new) {
        return;
    }
    push_test_then(
        ops,
        invertible,
        path,
        old,
        PatchOperation::Replace(ReplaceOperation {
            path: path.to_string(),
            value: new.clone(),
        }),
    );
}

fn diff_node(old: &Value, new: &Value, path: &str, invertible: bool, ops: &mut Vec<PatchOperation>) {
    if std::ptr::eq(old, new) {
        return;
    }
    if !same_container_kind(old, new) {
        diff_scalar_or_mismatch(old, new, path, invertible, ops);
        return;
    }
    match (old, new) {
        (Value::Array(old_items), Value::Array(new_items)) => {
            for idx in (0..old_items.len()).rev() {
                let child = child_path(path, &idx.to_string());
                if idx < new_items.len() {
                    let (ov, nv) = (&old_items[idx], &new_items[idx]);
                    if same_container_kind(ov, nv) {
                        diff_node(ov, nv, &child, invertible, ops);
                    } else {
                        diff_scalar_or_mismatch(ov, nv, &child, invertible, ops);
                    }
                } else {
                    let ov = &old_items[idx];
                    push_test_then(
                        ops,
                        invertible,
                        &child,
                        ov,
                        PatchOperation::Remove(RemoveOperation { path: child.clone() }),
                    );
                }
            }
            for nv in &new_items[old_items.len().min(new_items.len())..] {
                ops.push(PatchOperation::Add(AddOperation {
                    path: format!("{path}/-"),
                    value: nv.clone(),
                }));
            }
        }
        (Value::Object(old_map), Value::Object(new_map)) => {
            for (key, ov) in old_map.iter().rev() {
                let child = child_path(path, key);
                match new_map.get(key) {
                    Some(nv) if same_container_kind(ov, nv) => {
                        diff_node(ov, nv, &child, invertible, ops);
                    }
                    Some(nv) => diff_scalar_or_mismatch(ov, nv, &child, invertible, ops),
                    None => push_test_then(
                        ops,
                        invertible,
                        &child,
                        ov,
                        PatchOperation::Remove(RemoveOperation { path: child.clone() }),
                    ),
                }
            }
            for (key, nv) in new_map.iter() {
                if !old_map.contains_key(key) {
                    ops.push(PatchOperation::Add(AddOperation {
                        path: child_path(path, key),
                        value: nv.clone(),
                    }));
                }
            }
        }
        _ => unreachable!("same_container_kind already matched array/array or object/object"),
    }
}

/// Compare two JSON documents and produce a [`Patch`] that turns `a` into `b`.
///
/// When `invertible` is set, every removal and replacement is preceded by a `test` of the value
/// it is about to disturb, so the patch both verifies `a`'s state on replay and can be manually
/// read backwards. `compare(a, a)` always returns an empty patch.
///
/// # Examples
/// ```
/// use jsonpatch_rs::compare;
/// use serde_json::json;
///
/// let a = json!({"a": 1, "b": 2});
/// let b = json!({"a": 1, "b": 3});
/// let patch = compare(&a, &b, false);
/// assert_eq!(patch.0.len(), 1);
/// assert_eq!(patch.0[0].path(), "/b");
/// ```
pub fn compare(a: &Value, b: &Value, invertible: bool) -> Patch {
    if std::ptr::eq(a, b) {
        return Patch(Vec::new());
    }
    let mut ops = Vec::new();
    diff_node(a, b, "", invertible, &mut ops);
    Patch(ops)
}
