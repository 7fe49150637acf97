use std::env;

use crate::error::AppError;

/// Database URL for the running service, taken from `DATABASE_URL`.
///
/// Any sea-orm URL works: `postgres://…` in deployment, `sqlite::memory:`
/// or `sqlite://file.db?mode=rwc` locally.
pub fn database_url() -> Result<String, AppError> {
    let url = env::var("DATABASE_URL")
        .map_err(|_| AppError::config("Required environment variable 'DATABASE_URL' is not set"))?;
    if url.trim().is_empty() {
        return Err(AppError::config("DATABASE_URL is empty"));
    }
    Ok(url)
}
