//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid email address.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Account already exists.
    #[error("Admin account already exists with email: {0}")]
    AccountExists(String),

    /// Malformed seed data.
    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),

    /// Password hashing failure.
    #[error("Auth error: {0}")]
    Auth(#[from] tavola_server::auth::AuthError),

    /// Repository failure.
    #[error("Repository error: {0}")]
    Repository(#[from] tavola_server::db::RepositoryError),
}

/// Resolve the database URL from `TAVOLA_DATABASE_URL` or `DATABASE_URL`.
pub fn database_url() -> Result<String, CommandError> {
    dotenvy::dotenv().ok();
    std::env::var("TAVOLA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("TAVOLA_DATABASE_URL"))
}
