//! Password hashing and registration field checks

use crate::constants::{MIN_PASSWORD_LENGTH, PASSWORD_SYMBOLS};
use crate::{Error, Result};
use regex::Regex;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the username followed by the password
pub fn hash_password(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// At least [`MIN_PASSWORD_LENGTH`] characters, one uppercase letter and one symbol
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

/// Compiled patterns for the registration form fields
#[derive(Debug, Clone)]
pub struct CredentialRules {
    full_name: Regex,
    tax_code: Regex,
    email: Regex,
    username: Regex,
}

impl CredentialRules {
    pub fn new() -> Result<Self> {
        Ok(Self {
            full_name: compile(r"^[a-zA-Z\s]+$")?,
            tax_code: compile(r"^[A-Z]{6}[0-9]{2}[A-Z][0-9]{2}[A-Z][0-9]{3}[A-Z]$")?,
            email: compile(r"^[A-Za-z0-9_.\-]+@([A-Za-z0-9_\-]+\.)+[A-Za-z0-9_\-]{2,4}$")?,
            username: compile(r"^[a-zA-Z0-9._\-]{3,}$")?,
        })
    }

    /// Letters and spaces only
    pub fn is_valid_full_name(&self, full_name: &str) -> bool {
        self.full_name.is_match(full_name)
    }

    /// Italian tax code layout, e.g. `RSSMRA80A01H501T`
    pub fn is_valid_tax_code(&self, tax_code: &str) -> bool {
        self.tax_code.is_match(tax_code)
    }

    pub fn is_valid_email(&self, email: &str) -> bool {
        self.email.is_match(email)
    }

    /// Format only; whether the name is taken is checked against the store
    pub fn is_valid_username(&self, username: &str) -> bool {
        self.username.is_match(username)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        Error::invariant_violation(format!("invalid validation pattern {}: {}", pattern, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_concatenates_username() {
        // SHA-256("mrossi" + "Password1!")
        let hash = hash_password("mrossi", "Password1!");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, hash_password("mross", "iPassword1!"));
        assert_ne!(hash, hash_password("mrossi", "Password1?"));

        // SHA-256 of the empty string
        assert_eq!(
            hash_password("", ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_password_rules() {
        assert!(is_valid_password("Password1!"));
        assert!(is_valid_password("Abcdefg."));
        assert!(!is_valid_password("Abcdef."));
        assert!(!is_valid_password("password1!"));
        assert!(!is_valid_password("Password12"));
    }

    #[test]
    fn test_field_patterns() {
        let rules = CredentialRules::new().unwrap();

        assert!(rules.is_valid_full_name("Mario Rossi"));
        assert!(!rules.is_valid_full_name("Mario Rossi 2"));

        assert!(rules.is_valid_tax_code("RSSMRA80A01H501T"));
        assert!(!rules.is_valid_tax_code("rssmra80a01h501t"));
        assert!(!rules.is_valid_tax_code("RSSMRA80A01H501"));

        assert!(rules.is_valid_email("mario.rossi@example.it"));
        assert!(rules.is_valid_email("m-r_1@mail.example.com"));
        assert!(!rules.is_valid_email("mario.rossi@example"));
        assert!(!rules.is_valid_email("mario rossi@example.it"));

        assert!(rules.is_valid_username("m.rossi_80"));
        assert!(!rules.is_valid_username("mr"));
        assert!(!rules.is_valid_username("m rossi"));
    }
}
