//! Menu catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use tavola_core::{Category, MenuItemId};

use crate::db::RepositoryError;
use crate::db::menu_items::{MenuItemFilter, MenuItemRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::MenuItem;
use crate::state::AppState;
use crate::validation::{CreateMenuItemPayload, UpdateMenuItemPayload};

/// Query parameters of `GET /api/menu`.
#[derive(Debug, Deserialize)]
pub struct MenuListQuery {
    pub category: Option<Category>,
    pub available: Option<bool>,
}

fn not_found(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Menu item not found".to_owned()),
        other => other.into(),
    }
}

/// `GET /api/menu` - list the catalog, newest first. Public.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MenuListQuery>,
) -> Result<Json<Vec<MenuItem>>> {
    let items = MenuItemRepository::new(state.pool())
        .list(MenuItemFilter {
            category: query.category,
            available: query.available,
        })
        .await?;

    Ok(Json(items))
}

/// `GET /api/menu/{id}` - one catalog row. Public.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
) -> Result<Json<MenuItem>> {
    let item = MenuItemRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu item not found".to_owned()))?;

    Ok(Json(item))
}

/// `POST /api/menu` - create a catalog row. Admin only.
#[instrument(skip(state, payload))]
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuItemPayload>,
) -> Result<(StatusCode, Json<MenuItem>)> {
    let new = payload.validate()?;
    let item = MenuItemRepository::new(state.pool()).create(new).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/menu/{id}` - partial update. Admin only.
#[instrument(skip(state, payload))]
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
    Json(payload): Json<UpdateMenuItemPayload>,
) -> Result<Json<MenuItem>> {
    let changes = payload.validate()?;
    let item = MenuItemRepository::new(state.pool())
        .update(id, changes)
        .await
        .map_err(not_found)?;

    Ok(Json(item))
}

/// `DELETE /api/menu/{id}` - remove a catalog row. Admin only.
#[instrument(skip(state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
) -> Result<Json<Value>> {
    MenuItemRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found)?;

    Ok(Json(json!({ "message": "Menu item deleted successfully" })))
}
