//! Error taxonomy for patch application, validation and the prototype guard.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Machine-readable code identifying why a patch operation failed.
///
/// These mirror the error codes of the reference JSON Patch implementation so that
/// callers porting validation logic from it can match on the same names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchErrorKind {
    /// A patch document was not a JSON array.
    SequenceNotAnArray,
    /// A single operation was not a JSON object.
    OperationNotAnObject,
    /// `op` is missing or not one of the seven known operation names.
    OperationOpInvalid,
    /// `path` is missing, not a string, or non-empty without a leading `/`.
    OperationPathInvalid,
    /// `move`/`copy` is missing a string `from`.
    OperationFromRequired,
    /// `add`/`replace`/`test` is missing a `value`.
    OperationValueRequired,
    /// `value` contains the absent sentinel somewhere in its structure.
    OperationValueCannotContainUndefined,
    /// `add`'s `path` does not address an existing slot or the next new leaf.
    OperationPathCannotAdd,
    /// `path` does not resolve against the document.
    OperationPathUnresolvable,
    /// `from` does not resolve against the document.
    OperationFromUnresolvable,
    /// An array index segment is not `-` and not a valid non-negative integer.
    OperationPathIllegalArrayIndex,
    /// An array index is out of bounds for the addressed array.
    OperationValueOutOfBounds,
    /// A `test` operation's value did not match the document.
    TestOperationFailed,
}

impl PatchErrorKind {
    /// The stable, machine-readable name of this error code (matching the reference names).
    pub fn code(self) -> &'static str {
        match self {
            PatchErrorKind::SequenceNotAnArray => "SEQUENCE_NOT_AN_ARRAY",
            PatchErrorKind::OperationNotAnObject => "OPERATION_NOT_AN_OBJECT",
            PatchErrorKind::OperationOpInvalid => "OPERATION_OP_INVALID",
            PatchErrorKind::OperationPathInvalid => "OPERATION_PATH_INVALID",
            PatchErrorKind::OperationFromRequired => "OPERATION_FROM_REQUIRED",
            PatchErrorKind::OperationValueRequired => "OPERATION_VALUE_REQUIRED",
            PatchErrorKind::OperationValueCannotContainUndefined => {
                "OPERATION_VALUE_CANNOT_CONTAIN_UNDEFINED"
            }
            PatchErrorKind::OperationPathCannotAdd => "OPERATION_PATH_CANNOT_ADD",
            PatchErrorKind::OperationPathUnresolvable => "OPERATION_PATH_UNRESOLVABLE",
            PatchErrorKind::OperationFromUnresolvable => "OPERATION_FROM_UNRESOLVABLE",
            PatchErrorKind::OperationPathIllegalArrayIndex => {
                "OPERATION_PATH_ILLEGAL_ARRAY_INDEX"
            }
            PatchErrorKind::OperationValueOutOfBounds => "OPERATION_VALUE_OUT_OF_BOUNDS",
            PatchErrorKind::TestOperationFailed => "TEST_OPERATION_FAILED",
        }
    }
}

impl fmt::Display for PatchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// All possible errors that can occur when applying, validating or diffing a JSON patch.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct PatchError {
    /// Human-readable description of the failure.
    pub message: String,
    /// Machine-readable error code.
    pub kind: PatchErrorKind,
    /// Position of the offending operation within the patch sequence, if applicable.
    pub index: Option<usize>,
    /// The offending operation, serialized, if available.
    pub operation: Option<Value>,
    /// The document being operated on at the time of failure, if available.
    pub document: Option<Value>,
}

impl PatchError {
    /// Construct a bare error with just a kind and message.
    pub fn new(kind: PatchErrorKind, message: impl Into<String>) -> Self {
        PatchError {
            message: message.into(),
            kind,
            index: None,
            operation: None,
            document: None,
        }
    }

    /// Attach the index of the operation within its patch sequence.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Attach the offending operation (serialized) for diagnostics.
    pub fn with_operation(mut self, operation: Value) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Attach the document being operated on at the time of failure.
    pub fn with_document(mut self, document: Value) -> Self {
        self.document = Some(document);
        self
    }
}

/// Raised when a patch operation would write through `__proto__`, or through `prototype`
/// immediately beneath `constructor`.
///
/// This is a distinct type from [`PatchError`] so that callers cannot mistake a rejected
/// pollution attempt for an ordinary, recoverable patch failure.
#[derive(Debug, Error)]
#[error("rejected path segment {segment:?}: would reach through the prototype chain")]
pub struct ProtoPollutionError {
    /// The offending path segment.
    pub segment: String,
}

/// Everything that can go wrong while dispatching a single patch operation: either an ordinary
/// [`PatchError`] or a [`ProtoPollutionError`] from the prototype guard.
///
/// Kept as its own enum rather than folding [`ProtoPollutionError`] into [`PatchErrorKind`] so
/// that a caller matching on this can tell "the guard rejected this path" apart from any other
/// patch failure without relying on the message text or a shared `OperationPathInvalid` code.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// An ordinary patch failure.
    #[error(transparent)]
    Patch(#[from] PatchError),
    /// The prototype guard rejected a path segment.
    #[error(transparent)]
    ProtoPollution(#[from] ProtoPollutionError),
}

impl ApplyError {
    /// The stable, machine-readable code for this failure, for callers that want one string to
    /// match on regardless of variant.
    pub fn code(&self) -> &'static str {
        match self {
            ApplyError::Patch(e) => e.kind.code(),
            ApplyError::ProtoPollution(_) => "PROTO_POLLUTION_REJECTED",
        }
    }
}
