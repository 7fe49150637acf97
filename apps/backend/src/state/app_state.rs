use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::gate::AuthGate;
use crate::auth::jwt::TokenService;
use crate::auth::password::CredentialVerifier;
use crate::error::AppError;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    pub tokens: TokenService,
    pub gate: AuthGate,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    /// The pooled connection, or `503 DB_UNAVAILABLE` when the state was
    /// built without one.
    pub fn require_db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db.as_ref().ok_or_else(AppError::db_unavailable)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("tokens", &self.tokens)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
