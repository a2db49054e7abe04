//! Structural value equality and deep cloning.

use serde_json::Value;

/// Structural, type-strict equality between two JSON values, as used by `test`.
///
/// Arrays and objects are never equal to each other, even when "shaped" the same (e.g. an
/// object with keys `"0"`, `"1"` is never equal to a two-element array). Object key order does
/// not affect equality; arrays are compared positionally.
///
/// The reference implementation treats two `NaN`s as equal (`a !== a && b !== b`). JSON has no
/// NaN literal and `serde_json::Number::from_f64` refuses to construct a NaN or infinite
/// number, so a `Value::Number` built from parsed JSON or from `serde_json::json!` can never be
/// NaN; this branch is therefore dead for every `Value` reachable in practice. It is kept so
/// that `are_equal`'s contract matches the spec verbatim rather than silently dropping a case.
pub fn are_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (xf, yf) = (x.as_f64(), y.as_f64());
            match (xf, yf) {
                (Some(xf), Some(yf)) if xf.is_nan() && yf.is_nan() => true,
                _ => x == y,
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(xi, yi)| are_equal(xi, yi))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|yv| are_equal(v, yv)))
        }
        _ => a == b,
    }
}

/// JSON-safe deep clone of a value.
///
/// `serde_json::Value::clone` is already a total, structural deep clone for this value type
/// (there is no "undefined" case to collapse to `null`, unlike hosts whose value type can carry
/// one), so this simply delegates; it exists to keep the spec's external surface intact.
pub fn deep_clone(value: &Value) -> Value {
    value.clone()
}
