//! Order route handlers.
//!
//! Checkout (`POST /api/orders`) is the one public mutation: the submitted
//! cart is validated for shape and total consistency, then persisted
//! all-or-nothing with a server-side availability check. Status updates walk
//! the explicit transition table; anything outside it is rejected.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use tavola_core::{OrderId, OrderStatus};

use crate::db::RepositoryError;
use crate::db::orders::{OrderCreateError, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Order;
use crate::state::AppState;
use crate::validation::{CreateOrderPayload, FieldErrors};

/// Query parameters of `GET /api/orders`.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

/// Body of `PUT /api/orders/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderPayload {
    pub status: OrderStatus,
}

fn not_found(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Order not found".to_owned()),
        other => other.into(),
    }
}

/// `GET /api/orders` - list orders newest first, items expanded. Public.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list(query.status).await?;
    Ok(Json(orders))
}

/// `GET /api/orders/{id}` - one order, items expanded. Public.
#[instrument(skip(state))]
pub async fn get(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    Ok(Json(order))
}

/// `POST /api/orders` - checkout. Public.
///
/// Rejects the whole submission when any referenced menu item is unknown or
/// unavailable; a failed checkout persists nothing, so the client-side cart
/// can be retried as-is.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<(StatusCode, Json<Order>)> {
    let new = payload.validate(state.config().delivery_fee)?;

    let order = OrderRepository::new(state.pool())
        .create(new)
        .await
        .map_err(|e| match e {
            OrderCreateError::Unavailable(ids) => AppError::AvailabilityConflict(ids),
            OrderCreateError::Repository(e) => e.into(),
        })?;

    tracing::info!(order_id = %order.id, total = %order.total, "order placed");

    Ok((StatusCode::CREATED, Json(order)))
}

/// `PUT /api/orders/{id}` - update the status. Admin only.
#[instrument(skip(state))]
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<Json<Order>> {
    let repository = OrderRepository::new(state.pool());

    let order = repository
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    if !order.status.can_transition_to(payload.status) {
        let mut errors = FieldErrors::new();
        errors.push(
            "status",
            format!("cannot transition from {} to {}", order.status, payload.status),
        );
        return Err(errors.into());
    }

    let updated = repository
        .update_status(id, payload.status)
        .await
        .map_err(not_found)?;

    tracing::info!(order_id = %id, from = %order.status, to = %updated.status, "order status updated");

    Ok(Json(updated))
}

/// `DELETE /api/orders/{id}` - hard delete, line items cascade. Admin only.
#[instrument(skip(state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    OrderRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found)?;

    Ok(Json(json!({ "message": "Order deleted successfully" })))
}
