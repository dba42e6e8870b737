//! Staff account repository.

use sqlx::PgPool;

use tavola_core::{AdminId, Email};

use super::RepositoryError;
use crate::models::Admin;

const COLUMNS: &str = "id, email, name, password_hash, created_at, updated_at";

/// Repository for staff account operations.
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a staff account by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {COLUMNS} FROM admin WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(admin)
    }

    /// Get a staff account by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        let admin =
            sqlx::query_as::<_, Admin>(&format!("SELECT {COLUMNS} FROM admin WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(admin)
    }

    /// Create a staff account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<Admin, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admin (email, name, password_hash) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(admin)
    }
}
