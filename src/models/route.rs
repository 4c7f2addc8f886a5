// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Completed-route events and the history records derived from them.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How the route was travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TravelMode {
    Bike,
    Car,
}

/// Longest single route accepted, in km.
pub const MAX_ROUTE_KM: f64 = 1_000.0;
/// Longest single route accepted, in minutes (one week).
pub const MAX_DURATION_MIN: f64 = 7.0 * 24.0 * 60.0;
/// Upper bound for a client-reported CO₂ saving, in kg.
pub const MAX_ROUTE_CO2_KG: f64 = 1_000.0;
/// Upper bound for client-reported calories.
pub const MAX_ROUTE_CALORIES: f64 = 100_000.0;

/// A finished route as reported by the tracking client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCompletion {
    pub distance_km: f64,
    /// CO₂ saved; estimated from distance when absent.
    #[serde(default)]
    pub co2_kg: Option<f64>,
    /// Calories burned; estimated from distance when absent.
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub duration_min: f64,
    pub mode: TravelMode,
}

impl RouteCompletion {
    pub fn bike(distance_km: f64, co2_kg: f64, duration_min: f64) -> Self {
        Self {
            distance_km,
            co2_kg: Some(co2_kg),
            calories: None,
            duration_min,
            mode: TravelMode::Bike,
        }
    }

    pub fn is_bike(&self) -> bool {
        self.mode == TravelMode::Bike
    }

    /// Reject negative, non-finite or implausibly large measurements.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("distance_km", Some(self.distance_km), MAX_ROUTE_KM),
            ("duration_min", Some(self.duration_min), MAX_DURATION_MIN),
            ("co2_kg", self.co2_kg, MAX_ROUTE_CO2_KG),
            ("calories", self.calories, MAX_ROUTE_CALORIES),
        ];
        for (name, value, max) in fields {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(format!("'{}' must be a non-negative number", name));
                }
                if v > max {
                    return Err(format!("'{}' must be at most {}", name, max));
                }
            }
        }
        Ok(())
    }
}

/// Stored route history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RouteRecord {
    pub distance_km: f64,
    pub duration_min: f64,
    pub co2_kg: f64,
    pub calories: f64,
    pub mode: TravelMode,
    /// RFC3339 UTC timestamp
    pub finished_at: String,
}
