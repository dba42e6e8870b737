//! Menu catalog repository.

use sqlx::{PgPool, Postgres, QueryBuilder};

use tavola_core::{Category, MenuItemId};

use super::RepositoryError;
use crate::models::MenuItem;
use crate::validation::{MenuItemChanges, NewMenuItem};

const COLUMNS: &str = "id, name, description, price, image, category, is_available, created_at, updated_at";

/// Optional filters for listing the catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct MenuItemFilter {
    pub category: Option<Category>,
    pub available: Option<bool>,
}

/// Repository for menu catalog operations.
pub struct MenuItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MenuItemRepository<'a> {
    /// Create a new menu item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List menu items newest-first, optionally filtered by category and/or
    /// availability.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: MenuItemFilter) -> Result<Vec<MenuItem>, RepositoryError> {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM menu_item"));

        let mut has_where = false;
        if let Some(category) = filter.category {
            query.push(" WHERE category = ");
            query.push_bind(category);
            has_where = true;
        }
        if let Some(available) = filter.available {
            query.push(if has_where { " AND " } else { " WHERE " });
            query.push("is_available = ");
            query.push_bind(available);
        }
        query.push(" ORDER BY created_at DESC");

        let items = query
            .build_query_as::<MenuItem>()
            .fetch_all(self.pool)
            .await?;

        Ok(items)
    }

    /// Get one menu item by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {COLUMNS} FROM menu_item WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// Insert a new catalog row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: NewMenuItem) -> Result<MenuItem, RepositoryError> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "INSERT INTO menu_item (name, description, price, image, category, is_available) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(new.name)
        .bind(new.description)
        .bind(new.price)
        .bind(new.image)
        .bind(new.category)
        .bind(new.is_available)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Apply a partial update: unspecified fields keep their previous
    /// values, an explicit `image: null` clears the image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: MenuItemId,
        changes: MenuItemChanges,
    ) -> Result<MenuItem, RepositoryError> {
        let existing = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "UPDATE menu_item SET name = $2, description = $3, price = $4, image = $5, \
             category = $6, is_available = $7, updated_at = now() \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name.unwrap_or(existing.name))
        .bind(changes.description.unwrap_or(existing.description))
        .bind(changes.price.unwrap_or(existing.price))
        .bind(changes.image.unwrap_or(existing.image))
        .bind(changes.category.unwrap_or(existing.category))
        .bind(changes.is_available.unwrap_or(existing.is_available))
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Delete a catalog row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: MenuItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM menu_item WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
