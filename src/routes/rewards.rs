// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reward routes: goals, coupons and points.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Coupon, Goal, GoalIncrement};
use crate::services::RedeemOutcome;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Upper bound on entries in one progress batch.
const MAX_PROGRESS_ENTRIES: usize = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/goals", get(get_goals))
        .route("/api/goals/progress", post(post_goal_progress))
        .route("/api/coupons", get(get_coupons))
        .route("/api/coupons/{coupon_id}/redeem", post(redeem_coupon))
        .route("/api/admin/points", post(post_points))
}

// ─── Goals ───────────────────────────────────────────────────

/// A goal with its display percentage.
#[derive(Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub percent: u8,
}

impl From<Goal> for GoalView {
    fn from(goal: Goal) -> Self {
        Self {
            percent: goal.percent(),
            goal,
        }
    }
}

#[derive(Serialize)]
pub struct GoalsResponse {
    pub goals: Vec<GoalView>,
    pub unlocked_rewards: Vec<String>,
    /// Rewards unlocked by the request that produced this response
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub newly_unlocked: Vec<String>,
}

async fn get_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<GoalsResponse>> {
    let goals = state.progress.snapshot(&user.email).await.goals;
    Ok(Json(GoalsResponse {
        goals: goals.goals.into_iter().map(GoalView::from).collect(),
        unlocked_rewards: goals.unlocked_rewards,
        newly_unlocked: Vec::new(),
    }))
}

#[derive(Deserialize)]
struct GoalProgressRequest {
    entries: Vec<GoalIncrement>,
}

/// Apply progress entries in order. Unknown goal ids are ignored.
async fn post_goal_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<GoalProgressRequest>,
) -> Result<Json<GoalsResponse>> {
    if body.entries.len() > MAX_PROGRESS_ENTRIES {
        return Err(AppError::BadRequest(format!(
            "At most {} entries per request",
            MAX_PROGRESS_ENTRIES
        )));
    }
    if let Some(bad) = body
        .entries
        .iter()
        .find(|e| !e.value.is_finite() || e.value < 0.0)
    {
        return Err(AppError::BadRequest(format!(
            "Invalid value for goal '{}': must be a non-negative number",
            bad.goal_id
        )));
    }

    let (newly_unlocked, board) = state
        .progress
        .add_goal_progress(&user.email, &body.entries)
        .await;

    Ok(Json(GoalsResponse {
        goals: board.goals.into_iter().map(GoalView::from).collect(),
        unlocked_rewards: board.unlocked_rewards,
        newly_unlocked,
    }))
}

// ─── Coupons ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CouponsResponse {
    pub coupons: Vec<Coupon>,
    pub points: u64,
}

async fn get_coupons(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CouponsResponse>> {
    let rider = state.progress.snapshot(&user.email).await;
    Ok(Json(CouponsResponse {
        coupons: rider.coupons.coupons().to_vec(),
        points: rider.stats.points,
    }))
}

/// Redeem a coupon.
///
/// Business-rule failures (unknown, already redeemed, not enough points)
/// return 200 with `redeemed: false`.
async fn redeem_coupon(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(coupon_id): Path<String>,
) -> Result<Json<RedeemOutcome>> {
    let outcome = state.progress.redeem_coupon(&user.email, &coupon_id).await;
    if !outcome.redeemed {
        tracing::info!(email = %user.email, coupon_id = %coupon_id, "Coupon redemption refused");
    }
    Ok(Json(outcome))
}

// ─── Points ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct AddPointsRequest {
    /// Rider to credit
    email: String,
    points: u64,
}

#[derive(Serialize)]
pub struct PointsResponse {
    pub email: String,
    pub points: u64,
}

/// Credit points to a rider's balance (admin only).
async fn post_points(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AddPointsRequest>,
) -> Result<Json<PointsResponse>> {
    if !user.is_admin {
        return Err(AppError::Forbidden);
    }
    if body.points == 0 {
        return Err(AppError::BadRequest(
            "'points' must be greater than 0".to_string(),
        ));
    }
    let email = body.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::BadRequest("'email' is required".to_string()));
    }

    tracing::info!(
        admin_id = %user.user_id,
        admin = %user.email,
        rider = %email,
        points = body.points,
        "Admin point adjustment"
    );
    let points = state.progress.add_points(&email, body.points).await;
    Ok(Json(PointsResponse { email, points }))
}
