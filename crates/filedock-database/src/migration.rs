//! Embedded schema migrations for the registry tables.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use filedock_core::error::{AppError, ErrorKind};

/// Disk, folder and file tables, applied in order.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every pending migration.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(
        available = MIGRATOR.iter().count(),
        "Applying registry schema migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Schema migration failed: {e}"),
            e,
        )
    })?;

    info!("Registry schema is up to date");
    Ok(())
}
