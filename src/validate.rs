//! Static and document-aware validation of patch operations.
//!
//! Two tiers, matching the two different inputs a caller can hand in:
//!
//! - [`validate`] takes an untrusted, not-yet-typed [`Value`] (a whole patch sequence as it
//!   arrived over the wire) and checks its shape before anything is parsed into a [`PatchOperation`].
//! - [`validator`] takes an already-parsed, already-well-shaped [`PatchOperation`] and checks it
//!   against a document: does `path` (or `from`) actually resolve the way this op kind requires.
//!
//! [`apply_operation`](crate::apply_operation) uses only the second tier, since by the time it
//! holds a `PatchOperation` the shape checks the first tier performs have already been satisfied
//! by `serde`'s deserialization.

use serde_json::Value;

use crate::error::{ApplyError, PatchError, PatchErrorKind};
use crate::patch::{ApplyOptions, PatchOperation};
use crate::pointer;

const KNOWN_OPS: [&str; 6] = ["add", "remove", "replace", "move", "copy", "test"];

/// `serde_json::Value` has no "absent"/"undefined" variant (see DESIGN.md), so a `value` built
/// from valid JSON can never carry one. Kept so this check's contract matches the source
/// verbatim rather than silently disappearing.
fn contains_absent(_value: &Value) -> bool {
    false
}

/// Check one raw operation's shape (object-ness, `op`, `path`, and the `from`/`value`
/// requirements of its kind) and, if it passes, parse it into a [`PatchOperation`].
fn validate_operation_shape(value: &Value, index: usize) -> Result<PatchOperation, PatchError> {
    let obj = value.as_object().ok_or_else(|| {
        PatchError::new(PatchErrorKind::OperationNotAnObject, "operation must be a JSON object")
            .with_index(index)
            .with_operation(value.clone())
    })?;

    let op_name = obj.get("op").and_then(Value::as_str).ok_or_else(|| {
        PatchError::new(PatchErrorKind::OperationOpInvalid, "missing or non-string 'op'")
            .with_index(index)
            .with_operation(value.clone())
    })?;
    if !KNOWN_OPS.contains(&op_name) {
        return Err(PatchError::new(
            PatchErrorKind::OperationOpInvalid,
            format!("unknown operation '{op_name}'"),
        )
        .with_index(index)
        .with_operation(value.clone()));
    }

    let path = obj.get("path").and_then(Value::as_str).ok_or_else(|| {
        PatchError::new(PatchErrorKind::OperationPathInvalid, "missing or non-string 'path'")
            .with_index(index)
            .with_operation(value.clone())
    })?;
    if !path.is_empty() && !path.starts_with('/') {
        return Err(PatchError::new(
            PatchErrorKind::OperationPathInvalid,
            format!("path '{path}' must be empty or start with '/'"),
        )
        .with_index(index)
        .with_operation(value.clone()));
    }

    if matches!(op_name, "move" | "copy") && obj.get("from").and_then(Value::as_str).is_none() {
        return Err(PatchError::new(
            PatchErrorKind::OperationFromRequired,
            format!("'{op_name}' requires a string 'from'"),
        )
        .with_index(index)
        .with_operation(value.clone()));
    }

    if matches!(op_name, "add" | "replace" | "test") {
        match obj.get("value") {
            None => {
                return Err(PatchError::new(
                    PatchErrorKind::OperationValueRequired,
                    format!("'{op_name}' requires a 'value'"),
                )
                .with_index(index)
                .with_operation(value.clone()))
            }
            Some(v) if contains_absent(v) => {
                return Err(PatchError::new(
                    PatchErrorKind::OperationValueCannotContainUndefined,
                    "value must not contain the absent sentinel",
                )
                .with_index(index)
                .with_operation(value.clone()))
            }
            _ => {}
        }
    }

    serde_json::from_value(value.clone()).map_err(|e| {
        PatchError::new(
            PatchErrorKind::OperationOpInvalid,
            format!("malformed '{op_name}' operation: {e}"),
        )
        .with_index(index)
        .with_operation(value.clone())
    })
}

/// The deepest prefix of `path` that already exists in `doc`, as a JSON Pointer string.
///
/// Walks `doc` token by token, stopping at the first token that does not resolve (a missing
/// object key, an out-of-range or non-numeric array index, or a step into a scalar). The empty
/// string means "only the root exists" — note that this is the deepest existing prefix even when
/// `path` itself is malformed or unparseable as a pointer, in which case the whole of `path`
/// simply fails to resolve token by token from the first bad token onward.
pub(crate) fn deepest_existing_prefix(doc: &Value, path: &str) -> Option<String> {
    if path.is_empty() {
        return Some(String::new());
    }
    let tokens = pointer::split_pointer(path).ok()?;
    let mut current = doc;
    let mut resolved = Vec::with_capacity(tokens.len());
    for token in &tokens {
        let next = match current {
            Value::Object(map) => map.get(token),
            Value::Array(arr) => {
                if token == "-" {
                    None
                } else {
                    token.parse::<usize>().ok().and_then(|i| arr.get(i))
                }
            }
            _ => None,
        };
        match next {
            Some(v) => {
                resolved.push(token.as_str());
                current = v;
            }
            None => break,
        }
    }
    Some(pointer::join_pointer(resolved))
}

/// Document-aware check for an already-parsed operation: does `path` (and `from`, for `move`
/// and `copy`) resolve the way this operation kind requires.
///
/// `existing_fragment` is the deepest existing prefix of `path`, as returned by
/// [`deepest_existing_prefix`]; when `None` it is computed from `doc`. When `doc` is `None`
/// there is nothing to check against and this always succeeds — static shape has already been
/// established by the time a caller holds a [`PatchOperation`] at all.
pub fn validator(
    op: &PatchOperation,
    index: usize,
    doc: Option<&Value>,
    existing_fragment: Option<&str>,
) -> Result<(), PatchError> {
    let doc = match doc {
        Some(d) => d,
        None => return Ok(()),
    };
    let path = op.path();
    let fragment = match existing_fragment {
        Some(f) => f.to_string(),
        None => deepest_existing_prefix(doc, path).unwrap_or_default(),
    };

    match op {
        PatchOperation::Add(_) => {
            let path_len = pointer::split_pointer(path).map_err(|e| e.with_index(index))?.len();
            let fragment_len = pointer::split_pointer(&fragment)
                .map_err(|e| e.with_index(index))?
                .len();
            if path_len != fragment_len && path_len != fragment_len + 1 {
                return Err(PatchError::new(
                    PatchErrorKind::OperationPathCannotAdd,
                    format!("path '{path}' does not address an existing slot or a new leaf"),
                )
                .with_index(index)
                .with_operation(op.to_value()));
            }
        }
        PatchOperation::Replace(_) | PatchOperation::Remove(_) | PatchOperation::Test(_) => {
            if path != fragment {
                return Err(PatchError::new(
                    PatchErrorKind::OperationPathUnresolvable,
                    format!("path '{path}' does not resolve"),
                )
                .with_index(index)
                .with_operation(op.to_value()));
            }
        }
        PatchOperation::Move(o) => {
            if pointer::get_value_by_pointer(doc, &o.from).is_none() {
                return Err(PatchError::new(
                    PatchErrorKind::OperationFromUnresolvable,
                    format!("from '{}' does not resolve", o.from),
                )
                .with_index(index)
                .with_operation(op.to_value()));
            }
        }
        PatchOperation::Copy(o) => {
            if pointer::get_value_by_pointer(doc, &o.from).is_none() {
                return Err(PatchError::new(
                    PatchErrorKind::OperationFromUnresolvable,
                    format!("from '{}' does not resolve", o.from),
                )
                .with_index(index)
                .with_operation(op.to_value()));
            }
        }
    }
    Ok(())
}

/// Validate a whole patch sequence given as a raw [`Value`] (not yet parsed into [`PatchOperation`]s).
///
/// Checks the shape of every operation first, then — if `doc` is given — trial-applies the
/// sequence against a clone of it, returning the first error encountered instead of raising it.
/// Returns `None` when the whole sequence would apply cleanly.
pub fn validate(sequence: &Value, doc: Option<&Value>) -> Option<PatchError> {
    let ops = match sequence.as_array() {
        Some(a) => a,
        None => return Some(PatchError::new(PatchErrorKind::SequenceNotAnArray, "patch must be a JSON array")),
    };

    let mut parsed = Vec::with_capacity(ops.len());
    for (index, raw_op) in ops.iter().enumerate() {
        match validate_operation_shape(raw_op, index) {
            Ok(op) => parsed.push(op),
            Err(e) => return Some(e),
        }
    }

    if let Some(original) = doc {
        let mut working = original.clone();
        for (index, op) in parsed.iter().enumerate() {
            let fragment = deepest_existing_prefix(&working, op.path());
            if let Err(e) = validator(op, index, Some(&working), fragment.as_deref()) {
                return Some(e);
            }
            let opts = ApplyOptions {
                validate: false,
                mutate: true,
                ban_proto: true,
            };
            if let Err(e) = crate::patch::apply_operation(&mut working, op, opts, index) {
                // `validate`'s signature reports a single `PatchError` regardless of operation
                // kind; a prototype-pollution rejection here is folded into one with the guard's
                // message preserved. Callers that need the distinct type can get it from
                // `apply_operation`/`apply_patch` directly instead of from this summary check.
                return Some(match e {
                    ApplyError::Patch(pe) => pe,
                    ApplyError::ProtoPollution(pp) => {
                        PatchError::new(PatchErrorKind::OperationPathInvalid, pp.to_string())
                            .with_index(index)
                            .with_operation(op.to_value())
                    }
                });
            }
        }
    }

    None
}
