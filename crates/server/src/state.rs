//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenService;
use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The pool and token service are constructed
/// once at startup and injected here - no lazily initialized globals.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    tokens: TokenService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the session token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}
