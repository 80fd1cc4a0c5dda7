//! Schema migrations for the token tables.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use tokengate_core::error::{AppError, ErrorKind};

/// Migrations embedded from the workspace `migrations/` directory.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply any pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(
        known = MIGRATOR.iter().count(),
        "Applying token store migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Token store schema is up to date");
    Ok(())
}
