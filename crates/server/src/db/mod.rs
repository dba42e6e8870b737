//! Database access for the Tavola `PostgreSQL` store.
//!
//! # Tables
//!
//! - `menu_item` - the catalog (name, price, category, availability)
//! - `orders` / `order_item` - persisted checkouts and their line items
//! - `admin` - staff accounts for the dashboard
//!
//! Queries use runtime-checked `sqlx` forms; the connection pool is
//! constructed once at startup and injected through
//! [`AppState`](crate::state::AppState).
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p tavola-cli -- migrate
//! ```

pub mod admins;
pub mod menu_items;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The referenced row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be interpreted.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create a pool without establishing a connection.
///
/// Connections are opened on first use; useful for tests that exercise
/// request paths rejected before any storage access.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL cannot be parsed.
pub fn create_lazy_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(2)
        .connect_lazy(database_url.expose_secret())
}
