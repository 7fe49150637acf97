pub use sea_orm_migration::prelude::*;
pub use sea_orm::{ConnectionTrait, DatabaseConnection};

mod m20251019_000001_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251019_000001_create_users::Migration)]
    }
}

#[derive(Debug)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

/// Which of this crate's migrations a database has applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaState {
    /// Applied migration names, oldest first.
    pub applied: Vec<String>,
    /// Defined here but not yet applied.
    pub pending: Vec<String>,
}

impl SchemaState {
    pub fn latest(&self) -> Option<&str> {
        self.applied.last().map(String::as_str)
    }

    pub fn is_current(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Read the migration table. A database that has never been migrated
/// reports every migration as pending.
pub async fn schema_state(db: &DatabaseConnection) -> Result<SchemaState, DbErr> {
    let applied: Vec<String> = match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => migrations.iter().map(|m| m.name().to_string()).collect(),
        Err(DbErr::Exec(_)) => Vec::new(),
        Err(e) => return Err(e),
    };
    let pending = Migrator::migrations()
        .iter()
        .map(|m| m.name().to_string())
        .filter(|name| !applied.contains(name))
        .collect();

    Ok(SchemaState { applied, pending })
}

/// Run one migration command against an open connection.
/// Shared by the CLI, the backend's startup path and tests.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let before = schema_state(db).await?;
    tracing::info!(
        command = ?command,
        backend = ?backend,
        applied = before.applied.len(),
        pending = before.pending.len(),
        "migration starting"
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    if let Err(e) = result {
        tracing::error!(command = ?command, error = %e, "migration failed");
        return Err(e);
    }

    let after = schema_state(db).await?;
    tracing::info!(
        command = ?command,
        latest = after.latest().unwrap_or("none"),
        pending = after.pending.len(),
        "migration finished"
    );
    Ok(())
}
