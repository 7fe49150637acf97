//! Per-request authentication decision.
//!
//! The gate turns an optional `Authorization` header into either a
//! [`Principal`] or "anonymous". It never rejects a request itself; the
//! access policy downstream decides what anonymous callers may reach.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::jwt::{TokenError, TokenService};
use crate::auth::principal::Principal;
use crate::auth::user_lookup::UserLookup;
use crate::config::auth::AuthConfig;
use crate::logging::pii::Redacted;

/// Why a presented bearer token did not produce a principal.
///
/// Only ever logged. Callers see "no principal" for all of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("subject is not a numeric account id")]
    InvalidSubject,
    #[error("account missing or inactive")]
    AccountInactiveOrMissing,
    #[error("account lookup failed")]
    LookupFailed,
}

/// Result of running the gate on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Public path; nothing was parsed or resolved.
    Bypassed,
    /// No usable credentials. `None` when no bearer token was presented.
    Unauthenticated(Option<AuthFailure>),
    Authenticated(Principal),
}

impl GateOutcome {
    pub fn into_principal(self) -> Option<Principal> {
        match self {
            GateOutcome::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct AuthGate {
    tokens: TokenService,
    users: Arc<dyn UserLookup>,
    config: AuthConfig,
}

impl AuthGate {
    pub fn new(tokens: TokenService, users: Arc<dyn UserLookup>, config: AuthConfig) -> Self {
        Self {
            tokens,
            users,
            config,
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.config.public_paths.matches(path)
    }

    pub async fn authenticate(&self, path: &str, authorization: Option<&str>) -> GateOutcome {
        self.authenticate_at(path, authorization, SystemTime::now())
            .await
    }

    /// Run the gate as if the current time were `now`.
    pub async fn authenticate_at(
        &self,
        path: &str,
        authorization: Option<&str>,
        now: SystemTime,
    ) -> GateOutcome {
        if self.is_public(path) {
            return GateOutcome::Bypassed;
        }

        let Some(token) = bearer_token(authorization) else {
            return GateOutcome::Unauthenticated(None);
        };

        match self.resolve(token, now).await {
            Ok(principal) => {
                debug!(
                    user_id = principal.id(),
                    authority = %principal.authority,
                    "request authenticated"
                );
                GateOutcome::Authenticated(principal)
            }
            Err(failure) => {
                debug!(
                    path = %path,
                    token = %Redacted(token),
                    reason = %failure,
                    "bearer token rejected"
                );
                GateOutcome::Unauthenticated(Some(failure))
            }
        }
    }

    async fn resolve(&self, token: &str, now: SystemTime) -> Result<Principal, AuthFailure> {
        let claims = self.tokens.verify_at(token, now)?;

        let id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AuthFailure::InvalidSubject)?;

        let found = tokio::time::timeout(self.config.lookup_timeout, self.users.find(id))
            .await
            .map_err(|_| {
                warn!(
                    user_id = id,
                    timeout = ?self.config.lookup_timeout,
                    "account lookup timed out"
                );
                AuthFailure::LookupFailed
            })?
            .map_err(|e| {
                warn!(user_id = id, error = %e, "account lookup failed");
                AuthFailure::LookupFailed
            })?;

        match found {
            Some(account) if account.is_active => Ok(Principal::new(account, claims.role)),
            _ => Err(AuthFailure::AccountInactiveOrMissing),
        }
    }
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("tokens", &self.tokens)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The token of an `Authorization: Bearer <token>` header value.
///
/// Any other scheme, a missing or empty token, or surrounding junk after the
/// token yields `None`.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    let token = authorization?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}
