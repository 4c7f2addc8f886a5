// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end tests for recording routes through the API.

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_bike_route_updates_progress() {
    let (app, state) = common::create_test_app();
    let token = common::rider_token("rider@example.com", &state);

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/routes",
        Some(&token),
        Some(json!({ "distance_km": 12.5, "co2_kg": 2.0, "duration_min": 40.0, "mode": "bike" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points_awarded"], 125);
    assert_eq!(body["points"], 125);
    assert_eq!(body["total_km"], 12.5);
    assert_eq!(body["level"]["level"], "beginner");
    assert_eq!(body["level"]["progress_percent"], 25);
    assert_eq!(body["tier"], 2);
    assert_eq!(body["new_achievements"], json!(["10km"]));

    let (status, body) = common::send(&app, "GET", "/api/progress", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_km"], 12.5);
    assert_eq!(body["points"], 125);
    assert_eq!(body["bike_rides"], 1);
}

#[tokio::test]
async fn test_route_fans_out_to_goals() {
    let (app, state) = common::create_test_app();
    let token = common::rider_token("rider@example.com", &state);

    let (status, _) = common::send(
        &app,
        "POST",
        "/api/routes",
        Some(&token),
        Some(json!({ "distance_km": 55.0, "co2_kg": 3.0, "mode": "bike" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::send(&app, "GET", "/api/goals", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let goals = body["goals"].as_array().unwrap();
    let current = |id: &str| {
        goals
            .iter()
            .find(|g| g["id"] == id)
            .map(|g| g["current"].as_f64().unwrap())
            .unwrap()
    };
    assert_eq!(current("km"), 55.0);
    assert_eq!(current("co2"), 3.0);
    assert_eq!(current("rides"), 1.0);
    assert_eq!(current("long_ride"), 1.0);
    assert_eq!(body["unlocked_rewards"], json!(["Special adventure coupon"]));
}

#[tokio::test]
async fn test_car_route_only_recorded_in_history() {
    let (app, state) = common::create_test_app();
    let token = common::rider_token("rider@example.com", &state);

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/routes",
        Some(&token),
        Some(json!({ "distance_km": 30.0, "mode": "car" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points_awarded"], 0);
    assert_eq!(body["total_km"], 0.0);

    let (_, body) = common::send(&app, "GET", "/api/routes", Some(&token), None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["routes"][0]["mode"], "car");
}

#[tokio::test]
async fn test_route_history_newest_first_with_limit() {
    let (app, state) = common::create_test_app();
    let token = common::rider_token("rider@example.com", &state);

    for km in [1.0, 2.0, 3.0] {
        let (status, _) = common::send(
            &app,
            "POST",
            "/api/routes",
            Some(&token),
            Some(json!({ "distance_km": km, "mode": "bike" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) =
        common::send(&app, "GET", "/api/routes?limit=2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0]["distance_km"], 3.0);
    assert_eq!(routes[1]["distance_km"], 2.0);
}

#[tokio::test]
async fn test_invalid_routes_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::rider_token("rider@example.com", &state);

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/routes",
        Some(&token),
        Some(json!({ "distance_km": -4.0, "mode": "bike" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) =
        common::send(&app, "GET", "/api/routes?limit=0", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        common::send(&app, "GET", "/api/routes?limit=101", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was recorded
    let (_, body) = common::send(&app, "GET", "/api/progress", Some(&token), None).await;
    assert_eq!(body["bike_rides"], 0);
}

#[tokio::test]
async fn test_oversized_routes_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::rider_token("rider@example.com", &state);

    for _ in 0..2 {
        let (status, body) = common::send(
            &app,
            "POST",
            "/api/routes",
            Some(&token),
            Some(json!({ "distance_km": 1e308, "mode": "bike" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    let (status, _) = common::send(
        &app,
        "POST",
        "/api/routes",
        Some(&token),
        Some(json!({ "distance_km": 10.0, "calories": 1e12, "mode": "bike" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = common::send(&app, "GET", "/api/progress", Some(&token), None).await;
    assert_eq!(body["total_km"], 0.0);
    assert_eq!(body["points"], 0);
    assert_eq!(body["level"]["level"], "beginner");
    assert_eq!(body["tier"], 1);
}

#[tokio::test]
async fn test_riders_are_isolated() {
    let (app, state) = common::create_test_app();
    let alice = common::rider_token("alice@example.com", &state);
    let bob = common::rider_token("bob@example.com", &state);

    common::send(
        &app,
        "POST",
        "/api/routes",
        Some(&alice),
        Some(json!({ "distance_km": 20.0, "mode": "bike" })),
    )
    .await;

    let (_, body) = common::send(&app, "GET", "/api/progress", Some(&bob), None).await;
    assert_eq!(body["total_km"], 0.0);
    assert_eq!(body["points"], 0);
}

#[tokio::test]
async fn test_profile_update() {
    let (app, state) = common::create_test_app();
    let token = common::rider_token("rider@example.com", &state);

    let (status, body) = common::send(
        &app,
        "PUT",
        "/api/me",
        Some(&token),
        Some(json!({ "name": "  Ana  ", "weight_kg": 62.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ana");
    assert_eq!(body["weight_kg"], 62.5);

    let (status, _) = common::send(
        &app,
        "PUT",
        "/api/me",
        Some(&token),
        Some(json!({ "name": "Ana", "weight_kg": -1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::send(
        &app,
        "PUT",
        "/api/me",
        Some(&token),
        Some(json!({ "name": "x".repeat(101) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
