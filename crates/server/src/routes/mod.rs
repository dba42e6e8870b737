//! HTTP route handlers for the ordering API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB ping)
//!
//! # Menu catalog
//! GET    /api/menu             - List menu items (public, ?category=&available=)
//! GET    /api/menu/{id}        - Menu item detail (public)
//! POST   /api/menu             - Create menu item (admin)
//! PUT    /api/menu/{id}        - Partial update (admin)
//! DELETE /api/menu/{id}        - Delete menu item (admin)
//!
//! # Orders
//! GET    /api/orders           - List orders with items (public, ?status=)
//! GET    /api/orders/{id}      - Order detail (public)
//! POST   /api/orders           - Checkout (public)
//! PUT    /api/orders/{id}      - Update status (admin)
//! DELETE /api/orders/{id}      - Delete order (admin)
//!
//! # Admin session
//! POST /api/admin/login        - Login, sets auth cookie
//! POST /api/admin/logout       - Logout, clears auth cookie
//! GET  /api/admin/me           - Current principal or null
//! ```
//!
//! The route-policy middleware wraps everything; see
//! [`crate::middleware::policy`] for which paths require authentication.

pub mod admin;
pub mod menu;
pub mod orders;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

/// Create the menu catalog router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::list).post(menu::create))
        .route(
            "/{id}",
            get(menu::get).put(menu::update).delete(menu::delete),
        )
}

/// Create the orders router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route(
            "/{id}",
            get(orders::get)
                .put(orders::update_status)
                .delete(orders::delete),
        )
}

/// Create the admin session router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/me", get(admin::me))
}

/// Assemble the full application: API routes, health endpoints, and the
/// route-policy gate. Tracing/Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/menu", menu_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/admin", admin_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::route_policy,
        ))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
