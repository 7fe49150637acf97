use std::sync::Arc;

use crate::auth::gate::AuthGate;
use crate::auth::jwt::TokenService;
use crate::auth::password::{Argon2Verifier, CredentialVerifier};
use crate::auth::user_lookup::UserLookup;
use crate::config::auth::AuthConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::repos::users::SeaUserStore;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: Option<SecurityConfig>,
    auth_config: AuthConfig,
    db_url: Option<String>,
    user_lookup: Option<Arc<dyn UserLookup>>,
    credentials: Option<Arc<dyn CredentialVerifier>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: None,
            auth_config: AuthConfig::default(),
            db_url: None,
            user_lookup: None,
            credentials: None,
        }
    }

    /// Connect to `url` and migrate it during `build`.
    pub fn with_db_url(mut self, url: impl Into<String>) -> Self {
        self.db_url = Some(url.into());
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    pub fn with_auth_config(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = auth_config;
        self
    }

    /// Account store for the gate. Defaults to the database when one is
    /// configured.
    pub fn with_user_lookup(mut self, lookup: Arc<dyn UserLookup>) -> Self {
        self.user_lookup = Some(lookup);
        self
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialVerifier>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Fails with a config error when no signing key was supplied or when
    /// the gate would have no way to resolve accounts.
    pub async fn build(self) -> Result<AppState, AppError> {
        let security_config = self
            .security_config
            .ok_or_else(|| AppError::config("a signing key is required"))?;

        let db = match &self.db_url {
            Some(url) => Some(bootstrap_db(url).await?),
            None => None,
        };

        let user_lookup: Arc<dyn UserLookup> = match (self.user_lookup, &db) {
            (Some(lookup), _) => lookup,
            (None, Some(conn)) => Arc::new(SeaUserStore::new(conn.clone())),
            (None, None) => {
                return Err(AppError::config(
                    "either a database or a user lookup is required",
                ))
            }
        };

        let tokens = TokenService::new(&security_config);
        let gate = AuthGate::new(tokens.clone(), user_lookup, self.auth_config);

        Ok(AppState {
            db,
            tokens,
            gate,
            credentials: self
                .credentials
                .unwrap_or_else(|| Arc::new(Argon2Verifier::default())),
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
