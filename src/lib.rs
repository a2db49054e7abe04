//! A [JSON Patch (RFC 6902)](https://tools.ietf.org/html/rfc6902) and
//! [JSON Pointer (RFC 6901)](https://tools.ietf.org/html/rfc6901) implementation over in-memory
//! [`serde_json::Value`] documents.
//!
//! # Usage
//!
//! Add this to your *Cargo.toml*:
//! ```toml
//! [dependencies]
//! jsonpatch-rs = "*"
//! ```
//!
//! # Examples
//!
//! Apply a patch:
//!
//! ```rust
//! use jsonpatch_rs::{apply_patch, from_value, ApplyOptions};
//! use serde_json::json;
//!
//! let mut doc = json!([
//!     { "name": "Andrew" },
//!     { "name": "Maxim" }
//! ]);
//!
//! let p = from_value(json!([
//!   { "op": "test", "path": "/0/name", "value": "Andrew" },
//!   { "op": "add", "path": "/0/happy", "value": true }
//! ])).unwrap();
//!
//! apply_patch(&mut doc, &p, ApplyOptions::default()).unwrap();
//! assert_eq!(doc, json!([
//!   { "name": "Andrew", "happy": true },
//!   { "name": "Maxim" }
//! ]));
//! ```
//!
//! Diff two documents back into a patch:
//!
//! ```rust
//! use jsonpatch_rs::compare;
//! use serde_json::json;
//!
//! let left = json!({"title": "Goodbye!"});
//! let right = json!({"title": "Hello!"});
//! let p = compare(&left, &right, false);
//! assert_eq!(p.0.len(), 1);
//! ```
#![deny(warnings)]
#![warn(missing_docs)]

mod error;
mod guard;
mod ops;
mod patch;
mod pointer;
mod validate;
mod value;

#[cfg(feature = "diff")]
mod diff;

pub use error::{ApplyError, PatchError, PatchErrorKind, ProtoPollutionError};
pub use ops::OperationResult;
pub use patch::{
    apply_operation, apply_patch, apply_reducer, from_value, AddOperation, ApplyOptions,
    CopyOperation, MoveOperation, Patch, PatchOperation, RemoveOperation, ReplaceOperation,
    TestOperation,
};
pub use pointer::{
    escape_path_component, get_path, get_value_by_pointer, unescape_path_component,
};
pub use validate::{validate, validator};
pub use value::deep_clone;

#[cfg(feature = "diff")]
pub use diff::compare;
