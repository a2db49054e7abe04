//! Prototype-pollution guard.
//!
//! Rust values have no prototype chain, so `__proto__`/`constructor.prototype` writes cannot
//! actually reach a shared prototype here. The guard still rejects these path segments by
//! default so that a patch considered dangerous in one implementation of this ecosystem is
//! considered dangerous in all of them, and so a patch recorded against a JS-hosted document
//! cannot silently gain a new, surprising meaning when replayed against a Rust one.

use crate::error::ProtoPollutionError;

const PROTO_KEY: &str = "__proto__";
const CONSTRUCTOR_KEY: &str = "constructor";
const PROTOTYPE_KEY: &str = "prototype";

/// Check a sequence of already-unescaped path tokens for a prototype-pollution attempt.
///
/// Rejects any token equal to `__proto__`, and rejects `prototype` immediately following
/// `constructor`.
pub fn check_tokens(tokens: &[String]) -> Result<(), ProtoPollutionError> {
    for (idx, token) in tokens.iter().enumerate() {
        if token == PROTO_KEY {
            return Err(ProtoPollutionError {
                segment: token.clone(),
            });
        }
        if token == PROTOTYPE_KEY && idx > 0 && tokens[idx - 1] == CONSTRUCTOR_KEY {
            return Err(ProtoPollutionError {
                segment: token.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_proto_key() {
        let tokens = vec!["__proto__".to_string(), "polluted".to_string()];
        assert!(check_tokens(&tokens).is_err());
    }

    #[test]
    fn rejects_constructor_prototype_pair() {
        let tokens = vec!["constructor".to_string(), "prototype".to_string()];
        assert!(check_tokens(&tokens).is_err());
    }

    #[test]
    fn allows_constructor_alone() {
        let tokens = vec!["constructor".to_string(), "name".to_string()];
        assert!(check_tokens(&tokens).is_ok());
    }

    #[test]
    fn allows_prototype_not_after_constructor() {
        let tokens = vec!["foo".to_string(), "prototype".to_string()];
        assert!(check_tokens(&tokens).is_ok());
    }

    #[test]
    fn allows_ordinary_path() {
        let tokens = vec!["a".to_string(), "b".to_string()];
        assert!(check_tokens(&tokens).is_ok());
    }
}
