//! Rider statistics aggregate: totals, point balance and route history.
//!
//! The aggregate is updated in memory on every finished route and
//! persisted as a single snapshot per rider.

use serde::{Deserialize, Serialize};

use crate::models::achievement;
use crate::models::level::{compute_level, LevelProgress, RiderTier};
use crate::models::RouteRecord;

/// Points awarded per km of bike distance.
pub const POINTS_PER_KM: f64 = 10.0;

/// Pre-computed statistics for a rider.
///
/// Stored at: `stats_{email}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    // ─── Totals (bike only) ──────────────────────────────────────
    /// Cumulative bike distance; never decreases
    #[serde(default)]
    pub total_km: f64,
    #[serde(default)]
    pub total_co2_kg: f64,
    #[serde(default)]
    pub total_calories: f64,
    /// Number of finished bike routes
    #[serde(default)]
    pub bike_rides: u32,

    // ─── Rewards ─────────────────────────────────────────────────
    /// Point balance; never negative
    #[serde(default)]
    pub points: u64,
    /// Achievement ids, each present at most once
    #[serde(default)]
    pub achievements: Vec<String>,

    // ─── History ─────────────────────────────────────────────────
    /// Every reported route, bike and car, oldest first
    #[serde(default)]
    pub route_history: Vec<RouteRecord>,

    // ─── Metadata ────────────────────────────────────────────────
    /// Last update timestamp (ISO 8601)
    #[serde(default)]
    pub updated_at: String,
}

/// A route the aggregate refused to absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("route would push the rider's totals out of range")]
    TotalsOutOfRange,
}

/// What changed in the stats when a route was recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsDelta {
    pub points_awarded: u64,
    pub new_achievements: Vec<String>,
}

impl UserStats {
    /// Record a finished route.
    ///
    /// Every route lands in the history. Only bike routes move the totals,
    /// award `round(km × 10)` points and can earn achievements.
    ///
    /// A bike route whose totals would stop being finite is refused and
    /// leaves the aggregate untouched.
    pub fn add_route(
        &mut self,
        record: RouteRecord,
        now: &str,
    ) -> Result<StatsDelta, StatsError> {
        let is_bike = record.mode == crate::models::TravelMode::Bike;
        let distance_km = record.distance_km.max(0.0);
        let co2_kg = record.co2_kg.max(0.0);
        let calories = record.calories.max(0.0);

        let totals = if is_bike {
            let total_km = self.total_km + distance_km;
            let total_co2_kg = self.total_co2_kg + co2_kg;
            let total_calories = self.total_calories + calories;
            let bike_rides = self.bike_rides.checked_add(1);
            let finite =
                total_km.is_finite() && total_co2_kg.is_finite() && total_calories.is_finite();
            if !finite {
                return Err(StatsError::TotalsOutOfRange);
            }
            match bike_rides {
                Some(rides) => Some((total_km, total_co2_kg, total_calories, rides)),
                None => return Err(StatsError::TotalsOutOfRange),
            }
        } else {
            None
        };

        self.updated_at = now.to_string();
        self.route_history.push(record);

        let Some((total_km, total_co2_kg, total_calories, bike_rides)) = totals else {
            return Ok(StatsDelta::default());
        };

        self.total_km = total_km;
        self.total_co2_kg = total_co2_kg;
        self.total_calories = total_calories;
        self.bike_rides = bike_rides;

        let points_awarded = route_points(distance_km);
        self.add_points(points_awarded);

        let new_achievements: Vec<String> =
            achievement::earned(self.total_km, self.total_co2_kg, self.bike_rides)
                .into_iter()
                .filter(|id| !self.achievements.iter().any(|a| a.as_str() == *id))
                .map(String::from)
                .collect();
        self.achievements.extend(new_achievements.iter().cloned());

        Ok(StatsDelta {
            points_awarded,
            new_achievements,
        })
    }

    /// Unconditionally credit points.
    pub fn add_points(&mut self, points: u64) {
        self.points = self.points.saturating_add(points);
    }

    /// Debit points if the balance covers them.
    ///
    /// Returns `false` and leaves the balance untouched otherwise.
    pub fn spend_points(&mut self, points: u64) -> bool {
        match self.points.checked_sub(points) {
            Some(remaining) => {
                self.points = remaining;
                true
            }
            None => false,
        }
    }

    pub fn level(&self) -> LevelProgress {
        compute_level(self.total_km)
    }

    pub fn tier(&self) -> RiderTier {
        RiderTier::for_distance(self.total_km)
    }

    /// Most recent routes first, at most `limit`.
    pub fn recent_routes(&self, limit: usize) -> Vec<RouteRecord> {
        self.route_history.iter().rev().take(limit).cloned().collect()
    }
}

/// Points earned for a bike route of `distance_km`.
pub fn route_points(distance_km: f64) -> u64 {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return 0;
    }
    (distance_km * POINTS_PER_KM).round() as u64
}
