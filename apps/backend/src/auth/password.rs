use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::RngCore;

use crate::error::AppError;

/// One-way credential hashing as used by register and login.
pub trait CredentialVerifier: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AppError>;

    /// `false` for a wrong password and for an unparseable stored hash alike.
    fn matches(&self, password: &str, stored_hash: &str) -> bool;
}

/// Argon2id with the crate's default parameters, stored in PHC string form.
#[derive(Debug, Clone, Default)]
pub struct Argon2Verifier {
    hasher: Argon2<'static>,
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        let mut salt = [0u8; 16];
        rand::rng().fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| AppError::internal(format!("Failed to encode salt: {e}")))?;

        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
    }

    fn matches(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .hasher
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_match() {
        let verifier = Argon2Verifier::default();
        let hash = verifier.hash("correct horse battery").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verifier.matches("correct horse battery", &hash));
        assert!(!verifier.matches("correct horse battery!", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let verifier = Argon2Verifier::default();
        assert_ne!(
            verifier.hash("same-password").unwrap(),
            verifier.hash("same-password").unwrap()
        );
    }

    #[test]
    fn test_garbage_stored_hash_never_matches() {
        let verifier = Argon2Verifier::default();
        assert!(!verifier.matches("anything", "not-a-phc-string"));
        assert!(!verifier.matches("", ""));
    }
}
