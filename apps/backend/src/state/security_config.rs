use std::fmt;

use jsonwebtoken::Algorithm;
use rand::RngCore;

use crate::error::AppError;

/// Minimum signing key length accepted from configuration (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// Configuration for JWT security settings.
///
/// Holds the process-wide signing key. `Debug` never prints the key.
#[derive(Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm; HMAC-SHA256 unless a test overrides it
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret.
    ///
    /// No length check here; use [`SecurityConfig::from_env`] for keys that
    /// come from deployment configuration.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Load the signing key from `BACKEND_JWT_SECRET`.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("BACKEND_JWT_SECRET")
            .map_err(|_| AppError::config("BACKEND_JWT_SECRET must be set"))?;
        Self::checked(secret.into_bytes())
    }

    /// Like `new`, but rejects keys shorter than [`MIN_SECRET_LEN`] bytes.
    pub fn checked(jwt_secret: Vec<u8>) -> Result<Self, AppError> {
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::config(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                jwt_secret.len()
            )));
        }
        Ok(Self::new(jwt_secret))
    }

    /// Random 256-bit key, for tests that need isolation between apps.
    pub fn for_tests() -> Self {
        let mut secret = vec![0u8; MIN_SECRET_LEN];
        rand::rng().fill_bytes(&mut secret);
        Self::new(secret)
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let config = SecurityConfig::new("super-secret-signing-key-material!!".as_bytes());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("HS256"));
    }

    #[test]
    fn test_checked_rejects_short_keys() {
        assert!(matches!(
            SecurityConfig::checked(b"short".to_vec()),
            Err(AppError::Config { .. })
        ));
        assert!(SecurityConfig::checked(vec![7u8; MIN_SECRET_LEN]).is_ok());
    }

    #[test]
    fn test_for_tests_keys_differ() {
        assert_ne!(
            SecurityConfig::for_tests().jwt_secret,
            SecurityConfig::for_tests().jwt_secret
        );
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::remove_var("BACKEND_JWT_SECRET");
        assert!(SecurityConfig::from_env().is_err());

        std::env::set_var(
            "BACKEND_JWT_SECRET",
            "0123456789abcdef0123456789abcdef",
        );
        let config = SecurityConfig::from_env().unwrap();
        assert_eq!(config.jwt_secret.len(), 32);

        std::env::remove_var("BACKEND_JWT_SECRET");
    }
}
