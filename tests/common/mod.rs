// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use pedal_tracker::config::Config;
use pedal_tracker::db::LocalStore;
use pedal_tracker::middleware::auth::{create_jwt, create_jwt_with_role};
use pedal_tracker::routes::create_router;
use pedal_tracker::services::ProgressService;
use pedal_tracker::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app with an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with_store(LocalStore::new_memory())
}

/// Create a test app backed by the given store.
#[allow(dead_code)]
pub fn create_test_app_with_store(store: LocalStore) -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let progress = ProgressService::new(store, config.car_consumption_km_per_l);

    let state = Arc::new(AppState { config, progress });

    (create_router(state.clone()), state)
}

/// Token for a regular rider.
#[allow(dead_code)]
pub fn rider_token(email: &str, state: &AppState) -> String {
    create_jwt("user-1", email, &state.config.jwt_signing_key).expect("Failed to create JWT")
}

/// Token carrying the admin role.
#[allow(dead_code)]
pub fn admin_token(email: &str, state: &AppState) -> String {
    create_jwt_with_role("admin-1", email, Some("admin"), &state.config.jwt_signing_key)
        .expect("Failed to create JWT")
}

/// Send a request and return status plus parsed JSON body (Null if empty).
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
