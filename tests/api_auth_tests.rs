// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication tests for the rider API.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use pedal_tracker::middleware::auth::{create_jwt, SESSION_COOKIE};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["persistent_store"], false);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (app, _state) = common::create_test_app();

    for (method, uri) in [
        ("GET", "/api/me"),
        ("GET", "/api/progress"),
        ("GET", "/api/routes"),
        ("GET", "/api/goals"),
        ("GET", "/api/coupons"),
        ("POST", "/api/coupons/c1/redeem"),
        ("DELETE", "/api/session"),
    ] {
        let (status, _) = common::send(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let (app, _state) = common::create_test_app();

    let (status, _) = common::send(&app, "GET", "/api/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_key_rejected() {
    let (app, _state) = common::create_test_app();
    let token = create_jwt("user-1", "rider@example.com", b"some_other_key_entirely_32bytes").unwrap();

    let (status, _) = common::send(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_without_email_rejected() {
    let (app, state) = common::create_test_app();
    let token = create_jwt("user-1", "   ", &state.config.jwt_signing_key).unwrap();

    let (status, _) = common::send(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_bearer_token_accepted() {
    let (app, state) = common::create_test_app();
    let token = common::rider_token("Rider@Example.com", &state);

    let (status, body) = common::send(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    // Identity is the lowercased email
    assert_eq!(body["email"], "rider@example.com");
    assert_eq!(body["level"]["level"], "beginner");
    assert_eq!(body["level"]["progress_percent"], 0);
}

#[tokio::test]
async fn test_session_cookie_accepted() {
    let (app, state) = common::create_test_app();
    let token = common::rider_token("rider@example.com", &state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/progress")
                .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_preflight_from_frontend() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/me")
                .header(header::ORIGIN, state.config.frontend_url.as_str())
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        state.config.frontend_url.as_str()
    );
}

#[tokio::test]
async fn test_security_headers_present() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
}
