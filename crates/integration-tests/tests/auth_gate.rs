//! Authorization gate tests.
//!
//! Mutations on protected paths must be rejected 401 before any storage
//! access; reads and checkout must pass the gate without a token.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use tavola_integration_tests::test_app;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request")
}

#[tokio::test]
async fn health_is_public() {
    let response = test_app()
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn order_status_update_requires_token() {
    let uri = "/api/orders/7d1f6a6e-33a1-4c9a-9e09-5f0d5f4b7a10";
    let response = test_app()
        .oneshot(json_request("PUT", uri, r#"{"status":"CONFIRMED"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn order_delete_requires_token() {
    let uri = "/api/orders/7d1f6a6e-33a1-4c9a-9e09-5f0d5f4b7a10";
    let response = test_app()
        .oneshot(Request::delete(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn menu_mutations_require_token() {
    for request in [
        json_request("POST", "/api/menu", r#"{"name":"x"}"#),
        json_request(
            "PUT",
            "/api/menu/7d1f6a6e-33a1-4c9a-9e09-5f0d5f4b7a10",
            r#"{"name":"x"}"#,
        ),
        Request::delete("/api/menu/7d1f6a6e-33a1-4c9a-9e09-5f0d5f4b7a10")
            .body(Body::empty())
            .expect("request"),
    ] {
        let response = test_app().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let response = test_app()
        .oneshot(
            Request::delete("/api/menu/7d1f6a6e-33a1-4c9a-9e09-5f0d5f4b7a10")
                .header(header::COOKIE, "admin-token=not.a.token")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn upload_requires_token_even_for_reads() {
    let response = test_app()
        .oneshot(
            Request::get("/api/upload")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_reads_pass_the_gate() {
    // Reads reach the repository (and fail on the dead test database), so
    // anything but 401 proves the gate left them public.
    for uri in ["/api/menu", "/api/orders"] {
        let response = test_app()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_ne!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn checkout_passes_the_gate_without_token() {
    // An invalid payload is rejected by validation (400), not by the auth
    // gate (401): checkout is public.
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            r#"{"customerName":"","phone":"","address":"","items":[],"total":1}"#,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn me_without_token_is_null_principal() {
    let response = test_app()
        .oneshot(
            Request::get("/api/admin/me")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["admin"], Value::Null);
}

#[tokio::test]
async fn login_with_malformed_email_is_rejected_before_storage() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/admin/login",
            r#"{"email":"not-an-email","password":"hunter2!"}"#,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid input");
    assert!(body["details"].get("email").is_some());
}

#[tokio::test]
async fn malformed_ids_are_rejected_before_storage() {
    for uri in ["/api/menu/not-a-uuid", "/api/orders/42"] {
        let response = test_app()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}
