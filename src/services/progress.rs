// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rider progress service.
//!
//! Holds the loaded state of every active rider and applies the reward
//! rules to it:
//! 1. A finished bike route updates totals, points, achievements and goals
//! 2. Coupon redemption checks the ledger, then debits the point balance
//! 3. Every mutation is followed by an explicit save of the rider's snapshots
//!
//! State is loaded from the local store the first time an identity is seen
//! and dropped again on logout.

use crate::db::{keys, LocalStore};
use crate::models::goal::{ids, LONG_RIDE_KM};
use crate::models::{
    Coupon, CouponLedger, Goal, GoalBoard, GoalIncrement, LevelProgress, RouteCompletion,
    RouteRecord, StatsError, UserProfile, UserStats,
};
use crate::services::estimates;
use crate::time_utils::now_rfc3339;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the reward rules operate on for one rider.
#[derive(Debug, Clone, PartialEq)]
pub struct RiderState {
    pub profile: UserProfile,
    pub stats: UserStats,
    pub goals: GoalBoard,
    pub coupons: CouponLedger,
}

/// Result of recording a finished route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteOutcome {
    pub route: RouteRecord,
    pub points_awarded: u64,
    pub points: u64,
    pub level: LevelProgress,
    pub tier: u8,
    pub total_km: f64,
    /// Goal rewards unlocked by this route
    pub unlocked_rewards: Vec<String>,
    pub new_achievements: Vec<String>,
}

/// Result of a coupon redemption attempt.
#[derive(Debug, Clone, Serialize)]
pub struct RedeemOutcome {
    pub redeemed: bool,
    pub coupon: Option<Coupon>,
    /// Point balance after the attempt
    pub points: u64,
}

impl RiderState {
    /// Zeroed defaults for a rider with no stored snapshots.
    pub fn fresh(profile: UserProfile) -> Self {
        Self {
            profile,
            stats: UserStats::default(),
            goals: GoalBoard::default(),
            coupons: CouponLedger::default(),
        }
    }

    /// Load a rider's snapshots.
    ///
    /// Missing or unreadable snapshots fall back to defaults; read errors
    /// are logged and never surface to the caller.
    pub async fn load(store: &LocalStore, email: &str) -> Self {
        let profile: UserProfile = load_or_default(store, &keys::profile(email))
            .await
            .unwrap_or_else(|| UserProfile::builder(email).build());
        let stats: UserStats = load_or_default(store, &keys::stats(email))
            .await
            .unwrap_or_default();
        let goals: Option<Vec<Goal>> = load_or_default(store, &keys::goals(email)).await;
        let unlocked: Option<Vec<String>> =
            load_or_default(store, &keys::unlocked_rewards(email)).await;
        let coupons: CouponLedger = load_or_default(store, &keys::coupon_list(email))
            .await
            .unwrap_or_default();

        let goals = match goals {
            Some(goals) => GoalBoard::from_parts(goals, unlocked.unwrap_or_default()),
            None => GoalBoard::default(),
        };

        tracing::debug!(email, "Loaded rider state");

        Self {
            profile,
            stats,
            goals,
            coupons,
        }
    }

    /// Write every snapshot. Failures are logged and swallowed.
    pub async fn save(&self, store: &LocalStore) {
        let email = self.profile.email.as_str();
        let results = [
            store.set_json(&keys::profile(email), &self.profile).await,
            store.set_json(&keys::stats(email), &self.stats).await,
            store.set_json(&keys::goals(email), &self.goals.goals).await,
            store
                .set_json(&keys::unlocked_rewards(email), &self.goals.unlocked_rewards)
                .await,
            store.set_json(&keys::coupon_list(email), &self.coupons).await,
        ];

        for err in results.into_iter().filter_map(Result::err) {
            tracing::warn!(email, error = %err, "Failed to persist rider snapshot");
        }
    }

    /// Apply a finished route.
    ///
    /// Bike routes fan out to the point balance, level, achievements and
    /// goals. Car routes are only added to the history. A route that would
    /// overflow the totals is refused and changes nothing.
    pub fn record_route(
        &mut self,
        route: &RouteCompletion,
        car_consumption_km_per_l: f64,
        now: &str,
    ) -> Result<RouteOutcome, StatsError> {
        let distance_km = route.distance_km.max(0.0);
        let (co2_kg, calories) = if route.is_bike() {
            let speed = if route.duration_min > 0.0 {
                distance_km / (route.duration_min / 60.0)
            } else {
                estimates::DEFAULT_BIKE_SPEED_KMH
            };
            (
                route
                    .co2_kg
                    .unwrap_or_else(|| estimates::co2_saved_kg(distance_km, car_consumption_km_per_l)),
                route
                    .calories
                    .unwrap_or_else(|| estimates::calories_burned(distance_km, speed)),
            )
        } else {
            (0.0, 0.0)
        };

        let record = RouteRecord {
            distance_km,
            duration_min: route.duration_min.max(0.0),
            co2_kg,
            calories,
            mode: route.mode,
            finished_at: now.to_string(),
        };

        let delta = self.stats.add_route(record.clone(), now)?;

        let unlocked_rewards = if route.is_bike() {
            let mut increments = vec![
                GoalIncrement::new(ids::DISTANCE, distance_km),
                GoalIncrement::new(ids::CO2, co2_kg),
                GoalIncrement::new(ids::RIDES, 1.0),
            ];
            if distance_km >= LONG_RIDE_KM {
                increments.push(GoalIncrement::new(ids::LONG_RIDE, 1.0));
            }
            self.goals.add_progress_multi(&increments)
        } else {
            Vec::new()
        };

        Ok(RouteOutcome {
            route: record,
            points_awarded: delta.points_awarded,
            points: self.stats.points,
            level: self.stats.level(),
            tier: self.stats.tier().value(),
            total_km: self.stats.total_km,
            unlocked_rewards,
            new_achievements: delta.new_achievements,
        })
    }

    /// Redeem a coupon and debit its cost from the point balance.
    pub fn redeem_coupon(&mut self, coupon_id: &str) -> RedeemOutcome {
        let redeemed = self.coupons.redeem(coupon_id, self.stats.points);
        if redeemed {
            let cost = self
                .coupons
                .get(coupon_id)
                .map(|c| u64::from(c.points_cost))
                .unwrap_or(0);
            // Covered: the ledger only redeems when the balance suffices.
            let debited = self.stats.spend_points(cost);
            debug_assert!(debited);
        }

        RedeemOutcome {
            redeemed,
            coupon: self.coupons.get(coupon_id).cloned(),
            points: self.stats.points,
        }
    }
}

async fn load_or_default<T: serde::de::DeserializeOwned>(
    store: &LocalStore,
    key: &str,
) -> Option<T> {
    match store.get_json(key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to load snapshot, using defaults");
            None
        }
    }
}

/// Service owning all loaded rider states.
#[derive(Clone)]
pub struct ProgressService {
    store: LocalStore,
    sessions: Arc<DashMap<String, Arc<Mutex<RiderState>>>>,
    car_consumption_km_per_l: f64,
}

impl ProgressService {
    pub fn new(store: LocalStore, car_consumption_km_per_l: f64) -> Self {
        Self {
            store,
            sessions: Arc::new(DashMap::new()),
            car_consumption_km_per_l,
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Number of riders currently loaded.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Get the rider's state, loading it on first access.
    async fn session(&self, email: &str) -> Arc<Mutex<RiderState>> {
        if let Some(existing) = self.sessions.get(email) {
            return existing.clone();
        }

        let loaded = RiderState::load(&self.store, email).await;
        // Another request may have loaded the same rider meanwhile; keep the first.
        self.sessions
            .entry(email.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(loaded)))
            .clone()
    }

    /// A copy of the rider's current state.
    pub async fn snapshot(&self, email: &str) -> RiderState {
        self.session(email).await.lock().await.clone()
    }

    /// Record a finished route for the rider.
    pub async fn record_route(
        &self,
        email: &str,
        route: &RouteCompletion,
    ) -> Result<RouteOutcome, StatsError> {
        let session = self.session(email).await;
        let mut state = session.lock().await;

        let now = now_rfc3339();
        let outcome = state
            .record_route(route, self.car_consumption_km_per_l, &now)
            .inspect_err(|e| tracing::warn!(email, error = %e, "Route refused"))?;
        state.save(&self.store).await;

        tracing::info!(
            email,
            mode = ?route.mode,
            distance_km = outcome.route.distance_km,
            points_awarded = outcome.points_awarded,
            rewards = ?outcome.unlocked_rewards,
            "Route recorded"
        );
        Ok(outcome)
    }

    /// Attempt to redeem a coupon with the rider's points.
    pub async fn redeem_coupon(&self, email: &str, coupon_id: &str) -> RedeemOutcome {
        let session = self.session(email).await;
        let mut state = session.lock().await;

        let outcome = state.redeem_coupon(coupon_id);
        if outcome.redeemed {
            state.save(&self.store).await;
        }
        outcome
    }

    /// Credit points to the rider. Returns the new balance.
    pub async fn add_points(&self, email: &str, points: u64) -> u64 {
        let session = self.session(email).await;
        let mut state = session.lock().await;

        state.stats.add_points(points);
        state.save(&self.store).await;

        tracing::info!(email, points, balance = state.stats.points, "Points credited");
        state.stats.points
    }

    /// Apply goal increments in order. Returns the rewards unlocked and the
    /// resulting board.
    pub async fn add_goal_progress(
        &self,
        email: &str,
        entries: &[GoalIncrement],
    ) -> (Vec<String>, GoalBoard) {
        let session = self.session(email).await;
        let mut state = session.lock().await;

        let unlocked = state.goals.add_progress_multi(entries);
        state.save(&self.store).await;
        (unlocked, state.goals.clone())
    }

    /// Replace the rider's editable profile fields.
    pub async fn update_profile(
        &self,
        email: &str,
        name: String,
        weight_kg: Option<f64>,
    ) -> UserProfile {
        let session = self.session(email).await;
        let mut state = session.lock().await;

        state.profile = UserProfile::builder(email)
            .name(name)
            .weight_kg(weight_kg)
            .created_at(state.profile.created_at.clone())
            .build();
        state.save(&self.store).await;
        state.profile.clone()
    }

    /// Save the rider's state and drop it from memory.
    pub async fn logout(&self, email: &str) {
        if let Some((_, session)) = self.sessions.remove(email) {
            session.lock().await.save(&self.store).await;
            tracing::info!(email, "Rider session closed");
        }
    }
}
