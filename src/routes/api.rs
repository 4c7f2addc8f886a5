// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated riders: profile, progress and routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{LevelProgress, RouteCompletion, RouteRecord};
use crate::services::RouteOutcome;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_NAME_LEN: usize = 100;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/progress", get(get_progress))
        .route("/api/routes", get(get_routes).post(post_route))
        .route("/api/session", delete(end_session))
}

// ─── Rider Profile ───────────────────────────────────────────

/// Current rider response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub email: String,
    pub name: String,
    pub weight_kg: Option<f64>,
    pub created_at: String,
    pub level: LevelProgress,
    pub total_km: f64,
    pub total_co2_kg: f64,
    pub total_calories: f64,
}

/// Get current rider profile with derived level.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let rider = state.progress.snapshot(&user.email).await;

    Ok(Json(MeResponse {
        email: rider.profile.email,
        name: rider.profile.name,
        weight_kg: rider.profile.weight_kg,
        created_at: rider.profile.created_at,
        level: rider.stats.level(),
        total_km: rider.stats.total_km,
        total_co2_kg: rider.stats.total_co2_kg,
        total_calories: rider.stats.total_calories,
    }))
}

#[derive(Deserialize)]
struct UpdateProfileRequest {
    name: String,
    #[serde(default)]
    weight_kg: Option<f64>,
}

/// Replace the rider's name and weight.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<MeResponse>> {
    let name = body.name.trim().to_string();
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "'name' must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    if let Some(w) = body.weight_kg {
        if !w.is_finite() || w <= 0.0 {
            return Err(AppError::BadRequest(
                "'weight_kg' must be a positive number".to_string(),
            ));
        }
    }

    state
        .progress
        .update_profile(&user.email, name, body.weight_kg)
        .await;

    get_me(State(state), Extension(user)).await
}

// ─── Progress ────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressResponse {
    pub total_km: f64,
    pub level: LevelProgress,
    /// Numeric 1-5 tier, independent of `level`
    pub tier: u8,
    pub points: u64,
    pub bike_rides: u32,
    pub achievements: Vec<String>,
}

async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProgressResponse>> {
    let stats = state.progress.snapshot(&user.email).await.stats;

    Ok(Json(ProgressResponse {
        total_km: stats.total_km,
        level: stats.level(),
        tier: stats.tier().value(),
        points: stats.points,
        bike_rides: stats.bike_rides,
        achievements: stats.achievements,
    }))
}

// ─── Routes ──────────────────────────────────────────────────

/// Record a finished route.
async fn post_route(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(route): Json<RouteCompletion>,
) -> Result<Json<RouteOutcome>> {
    route.validate().map_err(AppError::BadRequest)?;

    let outcome = state
        .progress
        .record_route(&user.email, &route)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(outcome))
}

#[derive(Deserialize)]
struct RoutesQuery {
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    10
}

const MAX_LIMIT: u32 = 100;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoutesResponse {
    /// Newest first
    pub routes: Vec<RouteRecord>,
    pub total: u64,
}

/// Get the rider's recent routes.
async fn get_routes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RoutesQuery>,
) -> Result<Json<RoutesResponse>> {
    if params.limit < 1 || params.limit > MAX_LIMIT {
        return Err(AppError::BadRequest(format!(
            "'limit' must be between 1 and {}",
            MAX_LIMIT
        )));
    }

    let stats = state.progress.snapshot(&user.email).await.stats;
    tracing::debug!(email = %user.email, limit = params.limit, "Fetching route history");

    Ok(Json(RoutesResponse {
        routes: stats.recent_routes(params.limit as usize),
        total: u64::try_from(stats.route_history.len()).unwrap_or(u64::MAX),
    }))
}

// ─── Session ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionClosedResponse {
    pub success: bool,
}

/// Persist the rider's state and unload it.
async fn end_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionClosedResponse>> {
    state.progress.logout(&user.email).await;
    Ok(Json(SessionClosedResponse { success: true }))
}
