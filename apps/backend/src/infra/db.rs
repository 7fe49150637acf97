use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::error::AppError;

/// Open a pool for `database_url`. Does not run migrations.
///
/// In-memory SQLite gets a single long-lived connection; every pooled
/// connection would otherwise see its own empty database.
pub async fn connect_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    if database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory") {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(24 * 60 * 60))
            .max_lifetime(Duration::from_secs(24 * 60 * 60));
    }

    Ok(Database::connect(options).await?)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(database_url).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    info!(backend = ?conn.get_database_backend(), "database ready");
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, Statement};

    use super::*;

    #[tokio::test]
    async fn test_bootstrap_in_memory_sqlite() {
        let conn = bootstrap_db("sqlite::memory:").await.unwrap();
        let row = conn
            .query_one(Statement::from_string(
                conn.get_database_backend(),
                "SELECT COUNT(*) AS n FROM users".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i64 = row.try_get("", "n").unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_schema_state_tracks_migrations() {
        let conn = connect_db("sqlite::memory:").await.unwrap();

        let fresh = migration::schema_state(&conn).await.unwrap();
        assert!(fresh.applied.is_empty());
        assert_eq!(fresh.pending, vec!["m20251019_000001_create_users".to_string()]);
        assert!(!fresh.is_current());

        migrate(&conn, MigrationCommand::Up).await.unwrap();

        let current = migration::schema_state(&conn).await.unwrap();
        assert_eq!(current.latest(), Some("m20251019_000001_create_users"));
        assert!(current.is_current());
    }
}
