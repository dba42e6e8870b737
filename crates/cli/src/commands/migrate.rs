//! Database migration command.
//!
//! Runs the embedded migrations from `crates/server/migrations/`.

use sqlx::PgPool;

use super::{CommandError, database_url};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    pool.close().await;
    Ok(())
}
