//! RFC 6901 JSON Pointer codec: escaping, splitting and resolution.

use serde_json::Value;

use crate::error::{PatchError, PatchErrorKind};

/// Escape a single raw token for embedding in a JSON Pointer: `~` → `~0`, then `/` → `~1`.
///
/// Order matters: escaping `/` first would also escape the `0` it introduces into `~1`.
pub fn escape_token(token: &str) -> String {
    if !token.contains('~') && !token.contains('/') {
        return token.to_string();
    }
    token.replace('~', "~0").replace('/', "~1")
}

/// Unescape a single JSON Pointer token: `~1` → `/`, then `~0` → `~`.
///
/// Order matters and the two passes must not be fused into one: unescaping `~0` first
/// would turn `~01` into `/` instead of the correct `~1`.
pub fn unescape_token(token: &str) -> String {
    if !token.contains('~') {
        return token.to_string();
    }
    token.replace("~1", "/").replace("~0", "~")
}

/// Backwards-compatible alias for [`escape_token`], named after the reference implementation.
pub fn escape_path_component(token: &str) -> String {
    escape_token(token)
}

/// Backwards-compatible alias for [`unescape_token`], named after the reference implementation.
pub fn unescape_path_component(token: &str) -> String {
    unescape_token(token)
}

/// Split a JSON Pointer into its unescaped tokens.
///
/// An empty pointer addresses the document root and splits into zero tokens. A non-empty
/// pointer must start with `/`; splitting happens first, unescaping second, token by token.
pub fn split_pointer(pointer: &str) -> Result<Vec<String>, PatchError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    if !pointer.starts_with('/') {
        return Err(PatchError::new(
            PatchErrorKind::OperationPathInvalid,
            format!("path '{pointer}' must be empty or start with '/'"),
        ));
    }
    Ok(pointer[1..].split('/').map(unescape_token).collect())
}

/// Join already-unescaped tokens back into a JSON Pointer string, escaping each token.
pub fn join_pointer<'a, I: IntoIterator<Item = &'a str>>(tokens: I) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push('/');
        out.push_str(&escape_token(token));
    }
    out
}

/// Split the last token off of a pointer, returning the (still-escaped) parent pointer string
/// and the unescaped final token. Used when the parent container, not the final value, is
/// what needs to be located (as every mutating operation does).
pub fn split_parent(pointer: &str) -> Result<(&str, String), PatchError> {
    let idx = pointer.rfind('/').ok_or_else(|| {
        PatchError::new(
            PatchErrorKind::OperationPathInvalid,
            format!("path '{pointer}' has no parent"),
        )
    })?;
    Ok((&pointer[..idx], unescape_token(&pointer[idx + 1..])))
}

/// Parse an array index segment against an array of length `len`.
///
/// `-` is rejected here; callers special-case it where it is legal (only for `add`). RFC 6901
/// prohibits leading zeroes except for the literal `"0"`. When `allow_append` is set the valid
/// range is `0..=len` (an `add` may insert one past the last element); otherwise it is `0..len`.
pub fn parse_index(segment: &str, len: usize, allow_append: bool) -> Result<usize, PatchError> {
    if segment.starts_with('0') && segment.len() != 1 {
        return Err(PatchError::new(
            PatchErrorKind::OperationPathIllegalArrayIndex,
            format!("array index '{segment}' has a leading zero"),
        ));
    }
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PatchError::new(
            PatchErrorKind::OperationPathIllegalArrayIndex,
            format!("array index '{segment}' is not a non-negative integer"),
        ));
    }
    let idx = segment.parse::<usize>().map_err(|_| {
        PatchError::new(
            PatchErrorKind::OperationPathIllegalArrayIndex,
            format!("array index '{segment}' overflows a machine integer"),
        )
    })?;
    let in_bounds = if allow_append { idx <= len } else { idx < len };
    if in_bounds {
        Ok(idx)
    } else {
        Err(PatchError::new(
            PatchErrorKind::OperationValueOutOfBounds,
            format!("array index {idx} is out of bounds for array of length {len}"),
        ))
    }
}

/// Resolve a JSON Pointer against a document, returning the addressed value.
///
/// This is the public, read-only counterpart of the internal `_get` pseudo-operation: it never
/// mutates `doc` and never allocates a new root.
pub fn get_value_by_pointer<'a>(doc: &'a Value, pointer: &str) -> Option<&'a Value> {
    if pointer.is_empty() {
        return Some(doc);
    }
    doc.pointer(pointer)
}

/// Reverse lookup: find the JSON Pointer path from `root` to `node`, identified by reference
/// identity rather than structural equality (two structurally-equal subtrees at different
/// positions are different nodes for the purpose of this lookup).
///
/// Returns `"/"`, not `""`, when `node` is `root` itself — a quirk of the reference
/// implementation kept as-is rather than "corrected" to the otherwise-unused empty pointer.
pub fn get_path(root: &Value, node: &Value) -> Result<String, PatchError> {
    if std::ptr::eq(root, node) {
        return Ok("/".to_string());
    }
    let mut path = Vec::new();
    if search(root, node, &mut path) {
        Ok(join_pointer(path.iter().map(String::as_str)))
    } else {
        Err(PatchError::new(
            PatchErrorKind::OperationPathUnresolvable,
            "node is not reachable from root",
        ))
    }
}

fn search(current: &Value, target: &Value, path: &mut Vec<String>) -> bool {
    if std::ptr::eq(current, target) {
        return true;
    }
    match current {
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                path.push(idx.to_string());
                if search(item, target, path) {
                    return true;
                }
                path.pop();
            }
            false
        }
        Value::Object(map) => {
            for (key, value) in map.iter() {
                path.push(key.clone());
                if search(value, target, path) {
                    return true;
                }
                path.pop();
            }
            false
        }
        _ => false,
    }
}
