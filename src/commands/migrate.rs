//! Share store migrations.

use linkgate_core::config::AppConfig;
use linkgate_core::error::AppError;
use linkgate_database::DatabasePool;
use linkgate_database::migration::run_migrations;

/// Apply every pending migration to the configured database.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    let result = run_migrations(pool.pool()).await;
    pool.close().await;
    result?;

    println!("All migrations applied successfully.");
    Ok(())
}
