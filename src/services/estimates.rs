// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route-derived estimates used when the client does not supply them.

/// kg of CO₂ emitted per litre of gasoline burned.
pub const CO2_KG_PER_LITRE: f64 = 2.31;
/// Assumed average bike speed.
pub const DEFAULT_BIKE_SPEED_KMH: f64 = 20.0;
/// Calories burned per 30 minutes of riding.
const CALORIES_PER_30_MIN: f64 = 240.0;

/// CO₂ a car would have emitted over `distance_km`, rounded to 2 decimals.
///
/// `car_consumption_km_per_l` is the car's fuel economy. Non-positive
/// inputs yield 0.
pub fn co2_saved_kg(distance_km: f64, car_consumption_km_per_l: f64) -> f64 {
    if !(distance_km > 0.0 && car_consumption_km_per_l > 0.0) {
        return 0.0;
    }
    let litres_avoided = distance_km / car_consumption_km_per_l;
    (litres_avoided * CO2_KG_PER_LITRE * 100.0).round() / 100.0
}

/// Calories burned riding `distance_km` at `speed_kmh`.
pub fn calories_burned(distance_km: f64, speed_kmh: f64) -> f64 {
    if !(distance_km > 0.0 && speed_kmh > 0.0) {
        return 0.0;
    }
    let minutes = distance_km / speed_kmh * 60.0;
    (minutes / 30.0 * CALORIES_PER_30_MIN).round()
}
