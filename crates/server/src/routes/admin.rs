//! Admin session route handlers: login, logout, me.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};
use serde_json::{Value, json};
use tracing::instrument;

use crate::auth::{AuthService, token::TOKEN_TTL_SECONDS};
use crate::error::Result;
use crate::middleware::{OptionalAdmin, auth_cookie, clear_cookie};
use crate::models::AdminProfile;
use crate::state::AppState;
use crate::validation::LoginPayload;

/// `POST /api/admin/login` - verify credentials, set the session cookie.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    let credentials = payload.validate()?;

    let auth = AuthService::new(state.pool(), state.tokens());
    let (admin, token) = auth.login(&credentials.email, &credentials.password).await?;

    tracing::info!(admin_id = %admin.id, "admin logged in");

    let cookie = auth_cookie(&token, TOKEN_TTL_SECONDS, state.config().secure_cookies);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "admin": AdminProfile::from(&admin) })),
    ))
}

/// `POST /api/admin/logout` - overwrite the cookie with an expired value.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_cookie(state.config().secure_cookies);
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// `GET /api/admin/me` - the current principal, or null with 401.
#[instrument(skip(admin))]
pub async fn me(OptionalAdmin(admin): OptionalAdmin) -> (StatusCode, Json<Value>) {
    match admin {
        Some(admin) => (StatusCode::OK, Json(json!({ "admin": admin }))),
        None => (StatusCode::UNAUTHORIZED, Json(json!({ "admin": null }))),
    }
}
