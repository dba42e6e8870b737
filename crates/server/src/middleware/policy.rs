//! Declarative route authorization policy.
//!
//! Authorization for the whole API is decided here, before dispatch, from a
//! single table of (method class, path pattern) -> access rules evaluated
//! top to bottom, first match wins. Reads of menu and order data are
//! deliberately public; mutations require a verified admin token - except
//! checkout, which is the one public write. The upload path requires
//! authentication on every method.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::AuthError;
use crate::error::AppError;
use crate::middleware::auth::{CurrentAdmin, token_from_headers};
use crate::state::AppState;

/// Who may perform a matched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

/// Method class a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// GET / HEAD / OPTIONS
    Read,
    /// POST / PUT / PATCH / DELETE
    Write,
    /// Any method
    Any,
}

/// One policy rule: method class + path pattern -> access.
struct PolicyRule {
    scope: Scope,
    path: &'static str,
    /// Exact path match instead of prefix match.
    exact: bool,
    access: Access,
}

/// The route policy, evaluated top to bottom; first match wins.
/// Anything unmatched is public (reads, the admin session endpoints, health).
const ROUTE_POLICY: &[PolicyRule] = &[
    // File uploads require auth on all methods, reads included.
    PolicyRule {
        scope: Scope::Any,
        path: "/api/upload",
        exact: false,
        access: Access::Authenticated,
    },
    // Checkout is the one public write.
    PolicyRule {
        scope: Scope::Write,
        path: "/api/orders",
        exact: true,
        access: Access::Public,
    },
    PolicyRule {
        scope: Scope::Write,
        path: "/api/orders",
        exact: false,
        access: Access::Authenticated,
    },
    PolicyRule {
        scope: Scope::Write,
        path: "/api/menu",
        exact: false,
        access: Access::Authenticated,
    },
];

fn is_write(method: &Method) -> bool {
    *method == Method::POST
        || *method == Method::PUT
        || *method == Method::PATCH
        || *method == Method::DELETE
}

fn rule_matches(rule: &PolicyRule, method: &Method, path: &str) -> bool {
    let scope_matches = match rule.scope {
        Scope::Any => true,
        Scope::Write => is_write(method),
        Scope::Read => !is_write(method),
    };
    if !scope_matches {
        return false;
    }
    if rule.exact {
        path == rule.path
    } else {
        path.starts_with(rule.path)
    }
}

/// Decide the access required for a request.
#[must_use]
pub fn required_access(method: &Method, path: &str) -> Access {
    ROUTE_POLICY
        .iter()
        .find(|rule| rule_matches(rule, method, path))
        .map_or(Access::Public, |rule| rule.access)
}

/// Middleware enforcing the route policy.
///
/// Public requests pass through untouched. Protected requests must carry a
/// valid session cookie; the verified identity is stashed in request
/// extensions for extractors downstream. Failures are answered 401 without
/// dispatching to any handler.
pub async fn route_policy(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if required_access(request.method(), request.uri().path()) == Access::Public {
        return next.run(request).await;
    }

    let Some(token) = token_from_headers(request.headers()) else {
        return AppError::Auth(AuthError::MissingToken).into_response();
    };

    match state.tokens().verify(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(CurrentAdmin::from(claims));
            next.run(request).await
        }
        Err(e) => AppError::Auth(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_are_public() {
        assert_eq!(required_access(&Method::GET, "/api/menu"), Access::Public);
        assert_eq!(
            required_access(&Method::GET, "/api/menu/123"),
            Access::Public
        );
        assert_eq!(required_access(&Method::GET, "/api/orders"), Access::Public);
        assert_eq!(
            required_access(&Method::GET, "/api/orders/123"),
            Access::Public
        );
    }

    #[test]
    fn test_checkout_write_is_public() {
        assert_eq!(required_access(&Method::POST, "/api/orders"), Access::Public);
    }

    #[test]
    fn test_order_mutations_require_auth() {
        assert_eq!(
            required_access(&Method::PUT, "/api/orders/123"),
            Access::Authenticated
        );
        assert_eq!(
            required_access(&Method::DELETE, "/api/orders/123"),
            Access::Authenticated
        );
    }

    #[test]
    fn test_menu_mutations_require_auth() {
        assert_eq!(
            required_access(&Method::POST, "/api/menu"),
            Access::Authenticated
        );
        assert_eq!(
            required_access(&Method::PUT, "/api/menu/123"),
            Access::Authenticated
        );
        assert_eq!(
            required_access(&Method::DELETE, "/api/menu/123"),
            Access::Authenticated
        );
    }

    #[test]
    fn test_upload_requires_auth_on_all_methods() {
        assert_eq!(
            required_access(&Method::GET, "/api/upload"),
            Access::Authenticated
        );
        assert_eq!(
            required_access(&Method::POST, "/api/upload"),
            Access::Authenticated
        );
    }

    #[test]
    fn test_session_endpoints_are_public() {
        assert_eq!(
            required_access(&Method::POST, "/api/admin/login"),
            Access::Public
        );
        assert_eq!(
            required_access(&Method::POST, "/api/admin/logout"),
            Access::Public
        );
        assert_eq!(
            required_access(&Method::GET, "/api/admin/me"),
            Access::Public
        );
    }
}
