use async_trait::async_trait;
use serde::Serialize;

use crate::auth::claims::Role;
use crate::error::AppError;

/// What the gate needs to know about an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

/// Account store as seen by the authentication gate.
///
/// Implementations are shared across all workers and must tolerate
/// concurrent calls. `Ok(None)` means the account does not exist; `Err`
/// means the store could not answer.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find(&self, id: i64) -> Result<Option<UserRecord>, AppError>;
}
