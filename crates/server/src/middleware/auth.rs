//! Authentication cookie handling and extractors.
//!
//! The admin session token travels in an `HttpOnly`, `SameSite=Strict`
//! cookie scoped to the whole site. Handlers take [`RequireAdmin`] (reject
//! with 401) or [`OptionalAdmin`] (`None` when unauthenticated).

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use serde::Serialize;

use tavola_core::AdminId;

use crate::auth::{AuthError, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "admin-token";

/// The verified identity of the requesting staff member.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAdmin {
    pub id: AdminId,
    pub email: String,
    pub name: String,
}

impl From<Claims> for CurrentAdmin {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Extract the session token from the request's `Cookie` header(s).
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for cookie in raw.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=')
                && name == AUTH_COOKIE
            {
                return Some(value.to_owned());
            }
        }
    }
    None
}

/// Build the `Set-Cookie` value delivering `token`, expiring with it.
#[must_use]
pub fn auth_cookie(token: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie =
        format!("{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_seconds}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value overwriting the session cookie with an
/// immediately expired empty value.
#[must_use]
pub fn clear_cookie(secure: bool) -> String {
    auth_cookie("", 0, secure)
}

fn verify_request(parts: &Parts, state: &AppState) -> Result<CurrentAdmin, AuthError> {
    // The route-policy layer verifies protected mutations and stashes the
    // result; fall back to the cookie for paths it leaves public.
    if let Some(admin) = parts.extensions.get::<CurrentAdmin>() {
        return Ok(admin.clone());
    }

    let token = token_from_headers(&parts.headers).ok_or(AuthError::MissingToken)?;
    let claims = state.tokens().verify(&token)?;
    Ok(claims.into())
}

/// Extractor that requires an authenticated admin.
///
/// Rejects with a 401 JSON error before the handler body runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        verify_request(parts, &state)
            .map(Self)
            .map_err(AppError::Auth)
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike [`RequireAdmin`], this never rejects the request.
pub struct OptionalAdmin(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(Self(verify_request(parts, &state).ok()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn test_token_from_single_cookie() {
        let headers = headers_with_cookie("admin-token=abc.def.ghi");
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; admin-token=tok; lang=en");
        assert_eq!(token_from_headers(&headers).as_deref(), Some("tok"));
    }

    #[test]
    fn test_no_cookie_header() {
        assert!(token_from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_other_cookies_only() {
        let headers = headers_with_cookie("theme=dark; lang=en");
        assert!(token_from_headers(&headers).is_none());
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie("tok", 86400, false);
        assert_eq!(
            cookie,
            "admin-token=tok; Path=/; HttpOnly; SameSite=Strict; Max-Age=86400"
        );

        let secure = auth_cookie("tok", 86400, true);
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_cookie(false);
        assert!(cookie.starts_with("admin-token=; "));
        assert!(cookie.contains("Max-Age=0"));
    }
}
