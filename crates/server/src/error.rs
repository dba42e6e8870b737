//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` covering the API's failure taxonomy:
//! validation (with field-level detail), not-found, auth, availability
//! conflicts at checkout, and storage failures. All route handlers return
//! `Result<T, AppError>`; every error becomes a structured JSON response and
//! nothing crashes the process. Storage-class errors are captured to Sentry
//! before a generic body goes to the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use tavola_core::MenuItemId;

use crate::auth::AuthError;
use crate::db::RepositoryError;
use crate::validation::FieldErrors;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed, missing, or out-of-range input.
    #[error("invalid input")]
    Validation(FieldErrors),

    /// Referenced entity absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing/invalid/expired token or bad credentials.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout referenced unknown or unavailable menu items. The whole
    /// order was rejected.
    #[error("unavailable menu items")]
    AvailabilityConflict(Vec<MenuItemId>),

    /// The underlying store failed.
    #[error("database error: {0}")]
    Repository(RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_owned()),
            other => Self::Repository(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry before responding
        if matches!(self, Self::Repository(_) | Self::Internal(_))
            || matches!(&self, Self::Auth(AuthError::Crypto(_) | AuthError::Repository(_)))
        {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, body) = match &self {
            Self::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid input", "details": details }),
            ),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, json!({ "error": what })),
            Self::Auth(err) => auth_response(err),
            Self::AvailabilityConflict(ids) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Some items are no longer available",
                    "unavailableItems": ids,
                }),
            ),
            // Don't expose internal error details to clients
            Self::Repository(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn auth_response(err: &AuthError) -> (StatusCode, serde_json::Value) {
    match err {
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Invalid credentials" }),
        ),
        AuthError::MissingToken => (
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Authentication required" }),
        ),
        AuthError::InvalidToken | AuthError::ExpiredToken => (
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Invalid or expired token" }),
        ),
        AuthError::InvalidEmail(e) => (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() })),
        AuthError::Crypto(_) | AuthError::Repository(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Internal server error" }),
        ),
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::Validation(FieldErrors::new())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::NotFound("Order not found".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::MissingToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::AvailabilityConflict(vec![MenuItemId::generate()])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::ExpiredToken)),
            StatusCode::UNAUTHORIZED
        );
    }
}
