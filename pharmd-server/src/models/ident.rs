//! Postgres identifier validation
//!
//! `CREATE DATABASE` takes no bind parameters for the database or role
//! name, so anything spliced into that statement goes through this
//! newtype first.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Postgres truncates identifiers at 63 bytes
const MAX_IDENT_LEN: usize = 63;

/// Unquoted identifier pattern: starts with a lowercase letter or
/// underscore, then lowercase alphanumerics/underscores.
static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("invalid identifier regex"));

/// Validated Postgres identifier (database or role name)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PgIdent(String);

impl PgIdent {
    /// Create a new identifier, validating catalog naming rules.
    ///
    /// # Rules
    /// - Max 63 characters
    /// - Lowercase alphanumeric and underscores
    /// - Must not start with a digit
    ///
    /// # Example
    /// ```
    /// use pharmd_server::models::PgIdent;
    ///
    /// assert!(PgIdent::new("app").is_ok());
    /// assert!(PgIdent::new("App").is_err());   // uppercase
    /// assert!(PgIdent::new("1app").is_err());  // starts with digit
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty {
                field: "identifier",
            });
        }

        if s.len() > MAX_IDENT_LEN {
            return Err(ValidationError::TooLong {
                field: "identifier",
                max: MAX_IDENT_LEN,
            });
        }

        if !IDENT_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "identifier",
                reason: "must be lowercase alphanumeric with underscores, not starting with a digit",
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render double-quoted for splicing into DDL. The validated
    /// charset contains no quotes, so no escaping is needed.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl AsRef<str> for PgIdent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PgIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_identifiers() {
        assert!(PgIdent::new("app").is_ok());
        assert!(PgIdent::new("app_db").is_ok());
        assert!(PgIdent::new("_private").is_ok());
        assert!(PgIdent::new("a").is_ok());
        assert!(PgIdent::new("db2").is_ok());
    }

    #[test]
    fn rejects_uppercase() {
        let err = PgIdent::new("App").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_digit_start() {
        let err = PgIdent::new("1app").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_empty() {
        let err = PgIdent::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn rejects_quotes_and_spaces() {
        assert!(PgIdent::new("app db").is_err());
        assert!(PgIdent::new("app\"; DROP DATABASE x").is_err());
        assert!(PgIdent::new("app-db").is_err());
    }

    #[test]
    fn max_length() {
        let name_63 = "a".repeat(63);
        assert!(PgIdent::new(&name_63).is_ok());

        let name_64 = "a".repeat(64);
        let err = PgIdent::new(&name_64).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 63, .. }));
    }

    #[test]
    fn quoting() {
        let ident = PgIdent::new("app").unwrap();
        assert_eq!(ident.quoted(), "\"app\"");
    }
}
