//! Plaintext credential rows.
//!
//! Credentials live in a spreadsheet as (identifier, secret) pairs. They are
//! compared with exact string equality: no hashing, trimming or case folding.

use secrecy::{ExposeSecret, SecretString};

/// One (identifier, secret) row from a credential table.
///
/// `Debug` output redacts the secret.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Login identifier (username, email or patient name, depending on the table).
    pub identifier: String,
    /// The secret paired with the identifier.
    pub secret: SecretString,
}

impl Credential {
    /// Create a credential from its two fields.
    #[must_use]
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    /// Returns true when both fields are byte-for-byte equal to the inputs.
    #[must_use]
    pub fn matches(&self, identifier: &str, secret: &str) -> bool {
        self.identifier == identifier && self.secret.expose_secret() == secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_exact() {
        let cred = Credential::new("bob", "x1");
        assert!(cred.matches("bob", "x1"));
    }

    #[test]
    fn test_matches_is_case_sensitive_and_untrimmed() {
        let cred = Credential::new("bob", "x1");
        assert!(!cred.matches("Bob", "x1"));
        assert!(!cred.matches("bob ", "x1"));
        assert!(!cred.matches("bob", "X1"));
        assert!(!cred.matches("bob", "wrong"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cred = Credential::new("bob", "super-secret-value");
        let debug_output = format!("{cred:?}");
        assert!(debug_output.contains("bob"));
        assert!(!debug_output.contains("super-secret-value"));
    }
}
