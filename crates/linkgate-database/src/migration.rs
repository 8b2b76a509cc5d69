//! Schema migrations for the `oc_share` table.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use linkgate_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every migration that the database has not seen yet.
///
/// Safe to call on every start; already applied versions are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let known = MIGRATOR.iter().count();
    info!(known, "Applying share store migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Share store migration failed: {e}"),
            e,
        )
    })?;

    info!("Share store schema is up to date");
    Ok(())
}
