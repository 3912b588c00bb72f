//! Identifier validation.
//!
//! Values are always bound parameters, but table and column names have to be
//! interpolated into the SQL text. Every identifier passes through [`check`]
//! before interpolation; anything outside the allow-list pattern fails the
//! whole compilation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DbError, Result};

static IDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Validates a table or column name, returning it unchanged on success.
pub fn check(name: &str) -> Result<&str> {
    if IDENT_RE.is_match(name) {
        Ok(name)
    } else {
        Err(DbError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        for name in ["users", "created_at", "_tmp", "Shard3"] {
            assert!(check(name).is_ok());
        }
    }

    #[test]
    fn rejects_everything_else() {
        for name in ["", "3col", "name; DROP TABLE users", "a.b", "a b", "a-'"] {
            assert!(matches!(check(name), Err(DbError::InvalidIdentifier(_))));
        }
    }
}
