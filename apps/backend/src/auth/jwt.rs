use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::auth::claims::{Claims, Role};
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Lifetime of every access token.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(10 * 60 * 60);

/// Why a token failed verification.
///
/// None of these are retryable. The gate collapses all of them into
/// "no principal"; only logs see the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Issues and verifies HS256 access tokens with the process signing key.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&security.jwt_secret),
            decoding: DecodingKey::from_secret(&security.jwt_secret),
            algorithm: security.algorithm,
        }
    }

    /// Mint a token for `sub` valid for [`ACCESS_TOKEN_TTL`] from now.
    pub fn issue(&self, sub: &str, role: Role, email: Option<&str>) -> Result<String, AppError> {
        self.issue_at(sub, role, email, SystemTime::now())
    }

    /// Mint a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        sub: &str,
        role: Role,
        email: Option<&str>,
        now: SystemTime,
    ) -> Result<String, AppError> {
        if sub.trim().is_empty() {
            return Err(AppError::internal("refusing to mint a token without subject"));
        }

        let iat = unix_seconds(now)
            .ok_or_else(|| AppError::internal("Failed to get current time"))?;
        let exp = iat + ACCESS_TOKEN_TTL.as_secs() as i64;

        let claims = Claims {
            sub: sub.to_string(),
            email: email.map(str::to_string),
            role,
            iat,
            exp,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
    }

    /// Verify signature and expiry against the wall clock.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, SystemTime::now())
    }

    /// Verify signature and expiry as if the current time were `now`.
    ///
    /// Expiry is exclusive: a token is dead at `exp` itself. No leeway.
    pub fn verify_at(&self, token: &str, now: SystemTime) -> Result<Claims, TokenError> {
        if !is_compact_shape(token) {
            return Err(TokenError::Malformed);
        }

        // Expiry is checked below against the caller's clock, not the library's.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed);
        }

        let now = unix_seconds(now).ok_or(TokenError::Expired)?;
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Three non-empty base64url segments separated by dots.
fn is_compact_shape(token: &str) -> bool {
    let mut segments = 0;
    for segment in token.split('.') {
        segments += 1;
        if segment.is_empty()
            || !segment
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return false;
        }
    }
    segments == 3
}

fn unix_seconds(t: SystemTime) -> Option<i64> {
    t.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
}
