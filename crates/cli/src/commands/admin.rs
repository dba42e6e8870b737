//! Staff account management commands.

use sqlx::PgPool;

use tavola_core::Email;
use tavola_server::auth::hash_password;
use tavola_server::db::RepositoryError;
use tavola_server::db::admins::AdminRepository;

use super::{CommandError, database_url};

/// Create a new staff account with an argon2id-hashed password.
///
/// # Errors
///
/// Returns `CommandError::InvalidEmail` for a malformed email,
/// `CommandError::AccountExists` when the email is taken, or a
/// database/hashing error.
pub async fn create_account(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidEmail(e.to_string()))?;
    let password_hash = hash_password(password)?;

    let database_url = database_url()?;
    let pool = PgPool::connect(&database_url).await?;

    let admin = AdminRepository::new(&pool)
        .create(&email, name, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => CommandError::AccountExists(email.to_string()),
            other => CommandError::Repository(other),
        })?;

    tracing::info!(admin_id = %admin.id, email = %admin.email, "staff account created");
    pool.close().await;
    Ok(())
}
