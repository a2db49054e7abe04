//! JSON Patch document types (RFC 6902) and the applier.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApplyError;
use crate::ops::{self, OperationResult};
use crate::validate::validator;

/// A full JSON Patch: an ordered list of operations.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Patch(pub Vec<PatchOperation>);

/// `add` operation: set the value at `path`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddOperation {
    /// JSON Pointer (RFC 6901) to the location to add at.
    pub path: String,
    /// Value to add.
    pub value: Value,
}

/// `remove` operation: delete the value at `path`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RemoveOperation {
    /// JSON Pointer (RFC 6901) to the location to remove.
    pub path: String,
}

/// `replace` operation: overwrite the value at `path`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReplaceOperation {
    /// JSON Pointer (RFC 6901) to the location to replace.
    pub path: String,
    /// Value to replace with.
    pub value: Value,
}

/// `move` operation: relocate the value at `from` to `path`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MoveOperation {
    /// JSON Pointer (RFC 6901) to the location to move from.
    pub from: String,
    /// JSON Pointer (RFC 6901) to the location to move to.
    pub path: String,
}

/// `copy` operation: duplicate the value at `from` to `path`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CopyOperation {
    /// JSON Pointer (RFC 6901) to the location to copy from.
    pub from: String,
    /// JSON Pointer (RFC 6901) to the location to copy to.
    pub path: String,
}

/// `test` operation: assert that the value at `path` equals `value`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TestOperation {
    /// JSON Pointer (RFC 6901) to the location to test.
    pub path: String,
    /// Value to compare against.
    pub value: Value,
}

/// A single JSON Patch operation.
///
/// `_get`, used internally by [`crate::pointer::get_value_by_pointer`] and the diff generator,
/// has no variant here: it is a read-only pseudo-operation that never appears in a patch
/// document sent over the wire.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op")]
#[serde(rename_all = "lowercase")]
pub enum PatchOperation {
    /// See [`AddOperation`].
    Add(AddOperation),
    /// See [`RemoveOperation`].
    Remove(RemoveOperation),
    /// See [`ReplaceOperation`].
    Replace(ReplaceOperation),
    /// See [`MoveOperation`].
    Move(MoveOperation),
    /// See [`CopyOperation`].
    Copy(CopyOperation),
    /// See [`TestOperation`].
    Test(TestOperation),
}

impl PatchOperation {
    /// The lowercase operation name, as it appears on the wire.
    pub fn op_name(&self) -> &'static str {
        match self {
            PatchOperation::Add(_) => "add",
            PatchOperation::Remove(_) => "remove",
            PatchOperation::Replace(_) => "replace",
            PatchOperation::Move(_) => "move",
            PatchOperation::Copy(_) => "copy",
            PatchOperation::Test(_) => "test",
        }
    }

    /// The destination path common to every operation kind.
    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Add(o) => &o.path,
            PatchOperation::Remove(o) => &o.path,
            PatchOperation::Replace(o) => &o.path,
            PatchOperation::Move(o) => &o.path,
            PatchOperation::Copy(o) => &o.path,
            PatchOperation::Test(o) => &o.path,
        }
    }

    /// The source path, for `move`/`copy` only.
    pub fn from(&self) -> Option<&str> {
        match self {
            PatchOperation::Move(o) => Some(&o.from),
            PatchOperation::Copy(o) => Some(&o.from),
            _ => None,
        }
    }

    /// The carried value, for `add`/`replace`/`test` only.
    pub fn value(&self) -> Option<&Value> {
        match self {
            PatchOperation::Add(o) => Some(&o.value),
            PatchOperation::Replace(o) => Some(&o.value),
            PatchOperation::Test(o) => Some(&o.value),
            _ => None,
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Options shared by [`apply_operation`] and [`apply_patch`].
#[derive(Debug, Clone, Copy)]
pub struct ApplyOptions {
    /// Run the static + document-aware validator before dispatching each operation.
    pub validate: bool,
    /// Mutate the caller's document in place. When `false`, the whole sequence runs against an
    /// internal clone and the caller's document is left untouched unless every operation
    /// succeeds (see DESIGN.md for why this is strictly stronger than "no rollback").
    pub mutate: bool,
    /// Reject `__proto__` and `constructor`-then-`prototype` path segments.
    pub ban_proto: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        ApplyOptions {
            validate: false,
            mutate: true,
            ban_proto: true,
        }
    }
}

fn dispatch(doc: &mut Value, op: &PatchOperation, ban_proto: bool) -> Result<OperationResult, ApplyError> {
    match op {
        PatchOperation::Add(o) => ops::add(doc, &o.path, o.value.clone(), ban_proto),
        PatchOperation::Remove(o) => ops::remove(doc, &o.path, ban_proto),
        PatchOperation::Replace(o) => ops::replace(doc, &o.path, o.value.clone(), ban_proto),
        PatchOperation::Move(o) => ops::mov(doc, &o.from, &o.path, ban_proto),
        PatchOperation::Copy(o) => ops::copy(doc, &o.from, &o.path, ban_proto),
        PatchOperation::Test(o) => ops::test(doc, &o.path, &o.value),
    }
}

/// Apply a single operation to `doc`, per `opts`.
///
/// # Examples
/// ```
/// use jsonpatch_rs::{apply_operation, ApplyOptions, AddOperation, PatchOperation};
/// use serde_json::json;
///
/// let mut doc = json!({"foo": "bar"});
/// let op = PatchOperation::Add(AddOperation { path: "/baz".into(), value: json!("qux") });
/// apply_operation(&mut doc, &op, ApplyOptions::default(), 0).unwrap();
/// assert_eq!(doc, json!({"foo": "bar", "baz": "qux"}));
/// ```
pub fn apply_operation(
    doc: &mut Value,
    op: &PatchOperation,
    opts: ApplyOptions,
    index: usize,
) -> Result<OperationResult, ApplyError> {
    if opts.validate {
        let existing = crate::validate::deepest_existing_prefix(doc, op.path());
        validator(op, index, Some(doc), existing.as_deref())?;
    }
    dispatch(doc, op, opts.ban_proto).map_err(|e| match e {
        ApplyError::Patch(pe) => ApplyError::Patch(
            pe.with_index(index)
                .with_operation(op.to_value())
                .with_document(doc.clone()),
        ),
        other => other,
    })
}

/// Apply a full patch sequence to `doc`, per `opts`.
///
/// Operations are applied in order; an error aborts the sequence immediately (no rollback of
/// already-applied operations when `opts.mutate` is `true` — pass `mutate: false` or clone
/// first if you need atomicity).
///
/// # Examples
/// ```
/// use jsonpatch_rs::{apply_patch, from_value, ApplyOptions};
/// use serde_json::json;
///
/// let mut doc = json!([{ "name": "Andrew" }, { "name": "Maxim" }]);
/// let patch = from_value(json!([
///   { "op": "test", "path": "/0/name", "value": "Andrew" },
///   { "op": "add", "path": "/0/happy", "value": true }
/// ])).unwrap();
///
/// apply_patch(&mut doc, &patch, ApplyOptions::default()).unwrap();
/// assert_eq!(doc, json!([{ "name": "Andrew", "happy": true }, { "name": "Maxim" }]));
/// ```
pub fn apply_patch(
    doc: &mut Value,
    patch: &Patch,
    opts: ApplyOptions,
) -> Result<Vec<OperationResult>, ApplyError> {
    if opts.mutate {
        apply_sequence(doc, patch, opts)
    } else {
        let mut working = doc.clone();
        let results = apply_sequence(&mut working, patch, opts)?;
        *doc = working;
        Ok(results)
    }
}

fn apply_sequence(
    doc: &mut Value,
    patch: &Patch,
    opts: ApplyOptions,
) -> Result<Vec<OperationResult>, ApplyError> {
    let mut results = Vec::with_capacity(patch.0.len());
    for (index, op) in patch.0.iter().enumerate() {
        results.push(apply_operation(doc, op, opts, index)?);
    }
    Ok(results)
}

/// Apply a single operation to a clone of `doc` and return the resulting document.
///
/// A convenience wrapper for reducer-style call sites (fold a patch or an event stream over a
/// document one operation at a time); raises [`ApplyError`] on a failed `test` exactly like
/// [`apply_operation`] does.
pub fn apply_reducer(doc: &Value, op: &PatchOperation, index: usize) -> Result<Value, ApplyError> {
    let mut working = doc.clone();
    let result = apply_operation(&mut working, op, ApplyOptions::default(), index)?;
    Ok(result.new_document)
}

/// Parse a [`Patch`] out of an already-parsed [`serde_json::Value`].
///
/// # Examples
/// ```
/// use jsonpatch_rs::from_value;
/// use serde_json::json;
///
/// let patch = from_value(json!([
///   { "op": "test", "path": "/0/name", "value": "Andrew" },
///   { "op": "add", "path": "/0/happy", "value": true }
/// ])).unwrap();
/// assert_eq!(patch.0.len(), 2);
/// ```
pub fn from_value(value: Value) -> Result<Patch, serde_json::Error> {
    serde_json::from_value::<Vec<PatchOperation>>(value).map(Patch)
}
