//! Per-operation dispatch: the six primitive mutating/inspecting operations (`add`, `remove`,
//! `replace`, `move`, `copy`, `test`), specialised over object vs array containers, plus the
//! root-level special case of each (§4.3/§4.4 of the design doc).
//!
//! `_get` has no entry here: it is implemented directly as [`crate::pointer::get_value_by_pointer`],
//! since it is a pure read with no sensible slot in [`OperationResult`] (see DESIGN.md).

use serde_json::Value;

use crate::error::{ApplyError, PatchError, PatchErrorKind};
use crate::guard;
use crate::pointer::{self, get_value_by_pointer};
use crate::value::are_equal;

/// The outcome of applying a single primitive operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    /// The document after the operation, including any root replacement.
    pub new_document: Value,
    /// The value displaced by this operation, if any (remove, replace, array add-overwrite,
    /// or the pre-move value at a move's destination).
    pub removed: Option<Value>,
    /// The boolean outcome of a `test` operation.
    pub test: Option<bool>,
    /// The index an `add` inserted at, for array destinations.
    pub index: Option<usize>,
}

fn guard_path(path: &str, ban_proto: bool) -> Result<(), ApplyError> {
    if !ban_proto {
        return Ok(());
    }
    let tokens = pointer::split_pointer(path)?;
    guard::check_tokens(&tokens)?;
    Ok(())
}

fn unresolvable(path: &str) -> PatchError {
    PatchError::new(
        PatchErrorKind::OperationPathUnresolvable,
        format!("path '{path}' does not resolve against the document"),
    )
}

/// `add`: set the value addressed by `path`, inserting into an array or setting/overwriting an
/// object key. The special array token `-` appends.
pub fn add(
    doc: &mut Value,
    path: &str,
    value: Value,
    ban_proto: bool,
) -> Result<OperationResult, ApplyError> {
    if path.is_empty() {
        let removed = std::mem::replace(doc, value);
        return Ok(OperationResult {
            new_document: doc.clone(),
            removed: Some(removed),
            test: None,
            index: None,
        });
    }
    guard_path(path, ban_proto)?;
    let (parent_path, last) = pointer::split_parent(path)?;
    let index = {
        let parent = doc.pointer_mut(parent_path).ok_or_else(|| unresolvable(path))?;
        match parent {
            Value::Object(map) => {
                map.insert(last, value);
                None
            }
            Value::Array(arr) => {
                if last == "-" {
                    arr.push(value);
                    Some(arr.len() - 1)
                } else {
                    let idx = pointer::parse_index(&last, arr.len(), true)?;
                    arr.insert(idx, value);
                    Some(idx)
                }
            }
            _ => {
                return Err(PatchError::new(
                    PatchErrorKind::OperationPathUnresolvable,
                    format!("'{parent_path}' is not an object or array"),
                )
                .into())
            }
        }
    };
    Ok(OperationResult {
        new_document: doc.clone(),
        removed: None,
        test: None,
        index,
    })
}

/// `remove`: delete the value addressed by `path`, returning it as `removed`.
pub fn remove(doc: &mut Value, path: &str, ban_proto: bool) -> Result<OperationResult, ApplyError> {
    if path.is_empty() {
        let removed = std::mem::replace(doc, Value::Null);
        return Ok(OperationResult {
            new_document: doc.clone(),
            removed: Some(removed),
            test: None,
            index: None,
        });
    }
    guard_path(path, ban_proto)?;
    let (parent_path, last) = pointer::split_parent(path)?;
    let removed = {
        let parent = doc.pointer_mut(parent_path).ok_or_else(|| unresolvable(path))?;
        match parent {
            Value::Object(map) => map
                .remove(last.as_str())
                .ok_or_else(|| unresolvable(path))?,
            Value::Array(arr) => {
                let idx = pointer::parse_index(&last, arr.len(), false)?;
                arr.remove(idx)
            }
            _ => {
                return Err(PatchError::new(
                    PatchErrorKind::OperationPathUnresolvable,
                    format!("'{parent_path}' is not an object or array"),
                )
                .into())
            }
        }
    };
    Ok(OperationResult {
        new_document: doc.clone(),
        removed: Some(removed),
        test: None,
        index: None,
    })
}

/// `replace`: overwrite the value addressed by `path`, returning the old value as `removed`.
pub fn replace(
    doc: &mut Value,
    path: &str,
    value: Value,
    ban_proto: bool,
) -> Result<OperationResult, ApplyError> {
    if path.is_empty() {
        let removed = std::mem::replace(doc, value);
        return Ok(OperationResult {
            new_document: doc.clone(),
            removed: Some(removed),
            test: None,
            index: None,
        });
    }
    guard_path(path, ban_proto)?;
    let removed = {
        let target = doc.pointer_mut(path).ok_or_else(|| unresolvable(path))?;
        std::mem::replace(target, value)
    };
    Ok(OperationResult {
        new_document: doc.clone(),
        removed: Some(removed),
        test: None,
        index: None,
    })
}

/// `move`: relocate the value at `from` to `path`, defined as `remove(from)` followed by
/// `add(path, value)`. Captures the value displaced at `path` (if any) as `removed`, not the
/// moved-from value itself.
pub fn mov(
    doc: &mut Value,
    from: &str,
    path: &str,
    ban_proto: bool,
) -> Result<OperationResult, ApplyError> {
    guard_path(from, ban_proto)?;
    if path.starts_with(from) && path[from.len()..].starts_with('/') {
        return Err(PatchError::new(
            PatchErrorKind::OperationPathInvalid,
            format!("cannot move '{from}' into its own child '{path}'"),
        )
        .into());
    }
    let value = get_value_by_pointer(doc, from)
        .cloned()
        .ok_or_else(|| {
            PatchError::new(
                PatchErrorKind::OperationFromUnresolvable,
                format!("'{from}' does not resolve"),
            )
        })?;
    let displaced = get_value_by_pointer(doc, path).cloned();
    remove(doc, from, ban_proto)?;
    let added = add(doc, path, value, ban_proto)?;
    Ok(OperationResult {
        new_document: doc.clone(),
        removed: displaced,
        test: None,
        index: added.index,
    })
}

/// `copy`: deep-clone the value at `from` and `add` it at `path`.
pub fn copy(
    doc: &mut Value,
    from: &str,
    path: &str,
    ban_proto: bool,
) -> Result<OperationResult, ApplyError> {
    guard_path(from, ban_proto)?;
    let source = get_value_by_pointer(doc, from)
        .cloned()
        .ok_or_else(|| {
            PatchError::new(
                PatchErrorKind::OperationFromUnresolvable,
                format!("'{from}' does not resolve"),
            )
        })?;
    add(doc, path, source, ban_proto)
}

/// `test`: compare the value at `path` against `expected` with [`are_equal`]. A mismatch is
/// reported as [`PatchErrorKind::TestOperationFailed`] rather than a successful result with
/// `test: Some(false)` — a patch either verifies or it doesn't apply.
pub fn test(doc: &Value, path: &str, expected: &Value) -> Result<OperationResult, ApplyError> {
    let target = if path.is_empty() {
        doc
    } else {
        doc.pointer(path).ok_or_else(|| unresolvable(path))?
    };
    if !are_equal(target, expected) {
        return Err(PatchError::new(
            PatchErrorKind::TestOperationFailed,
            format!("value at '{path}' did not match the expected value"),
        )
        .into());
    }
    Ok(OperationResult {
        new_document: doc.clone(),
        removed: None,
        test: Some(true),
        index: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_object_key() {
        let mut doc = json!({"foo": "bar"});
        let res = add(&mut doc, "/baz", json!("qux"), true).unwrap();
        assert_eq!(res.new_document, json!({"foo": "bar", "baz": "qux"}));
        assert_eq!(doc, json!({"foo": "bar", "baz": "qux"}));
    }

    #[test]
    fn add_array_append_token() {
        let mut doc = json!({"a": [1, 2, 3]});
        let res = add(&mut doc, "/a/-", json!(4), true).unwrap();
        assert_eq!(doc, json!({"a": [1, 2, 3, 4]}));
        assert_eq!(res.index, Some(3));
    }

    #[test]
    fn remove_array_element() {
        let mut doc = json!({"foo": ["bar", "baz"]});
        let res = remove(&mut doc, "/foo/1", true).unwrap();
        assert_eq!(doc, json!({"foo": ["bar"]}));
        assert_eq!(res.removed, Some(json!("baz")));
    }

    #[test]
    fn replace_reports_previous_value() {
        let mut doc = json!({"x": 1});
        let res = replace(&mut doc, "/x", json!(2), true).unwrap();
        assert_eq!(doc, json!({"x": 2}));
        assert_eq!(res.removed, Some(json!(1)));
    }

    #[test]
    fn move_relocates_value() {
        let mut doc = json!({"a": {"b": 1}, "c": {}});
        mov(&mut doc, "/a/b", "/c/b", true).unwrap();
        assert_eq!(doc, json!({"a": {}, "c": {"b": 1}}));
    }

    #[test]
    fn move_into_own_child_is_rejected() {
        let mut doc = json!({"a": {"b": 1}});
        assert!(mov(&mut doc, "/a", "/a/b", true).is_err());
    }

    #[test]
    fn copy_duplicates_value() {
        let mut doc = json!({"a": {"b": 1}, "c": {}});
        copy(&mut doc, "/a", "/c/a", true).unwrap();
        assert_eq!(doc, json!({"a": {"b": 1}, "c": {"a": {"b": 1}}}));
    }

    #[test]
    fn test_matching_value_succeeds() {
        let doc = json!({"x": 1});
        let res = test(&doc, "/x", &json!(1)).unwrap();
        assert_eq!(res.test, Some(true));
    }

    #[test]
    fn test_mismatched_value_fails() {
        let doc = json!({"x": 1});
        let err = test(&doc, "/x", &json!(2)).unwrap_err();
        match err {
            ApplyError::Patch(e) => assert_eq!(e.kind, PatchErrorKind::TestOperationFailed),
            ApplyError::ProtoPollution(_) => panic!("expected a patch error"),
        }
    }

    #[test]
    fn proto_guard_blocks_add() {
        let mut doc = json!({});
        let err = add(&mut doc, "/__proto__/polluted", json!(true), true).unwrap_err();
        assert!(matches!(err, ApplyError::ProtoPollution(_)));
    }

    #[test]
    fn proto_guard_can_be_disabled() {
        let mut doc = json!({});
        // With the guard off this resolves like any ordinary nested path; there is no existing
        // "__proto__" object here so it still fails to resolve, but for a different reason.
        let err = add(&mut doc, "/__proto__/polluted", json!(true), false).unwrap_err();
        match err {
            ApplyError::Patch(e) => assert_eq!(e.kind, PatchErrorKind::OperationPathUnresolvable),
            ApplyError::ProtoPollution(_) => panic!("guard is disabled, should not fire"),
        }
    }

    #[test]
    fn root_replace_reports_whole_document_as_removed() {
        let mut doc = json!({"a": 1});
        let res = replace(&mut doc, "", json!({"b": 2}), true).unwrap();
        assert_eq!(doc, json!({"b": 2}));
        assert_eq!(res.removed, Some(json!({"a": 1})));
    }
}
