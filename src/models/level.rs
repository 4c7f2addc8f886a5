// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Rider levels derived from cumulative bike distance.
//!
//! Two independent schemes exist and are intentionally kept apart:
//! - [`Level`]: the descriptive three-tier level shown on the profile,
//!   with a percentage toward the next tier.
//! - [`RiderTier`]: a numeric 1-5 tier shown next to the distance counter.
//!
//! Both are always derived from `total_km` and never stored.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Distance at which a rider becomes [`Level::Intermediate`].
pub const INTERMEDIATE_KM: f64 = 50.0;
/// Distance at which a rider becomes [`Level::Advanced`].
pub const ADVANCED_KM: f64 = 200.0;

/// Descriptive rider level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// A level together with the percentage completed toward the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LevelProgress {
    pub level: Level,
    /// 0-100; always 100 at [`Level::Advanced`].
    pub progress_percent: u8,
}

/// Compute the three-tier level for a cumulative distance.
///
/// Negative or non-finite input is treated as zero distance.
pub fn compute_level(total_km: f64) -> LevelProgress {
    let km = if total_km.is_finite() && total_km > 0.0 {
        total_km
    } else {
        0.0
    };

    if km >= ADVANCED_KM {
        LevelProgress {
            level: Level::Advanced,
            progress_percent: 100,
        }
    } else if km >= INTERMEDIATE_KM {
        LevelProgress {
            level: Level::Intermediate,
            progress_percent: percent(km - INTERMEDIATE_KM, ADVANCED_KM - INTERMEDIATE_KM),
        }
    } else {
        LevelProgress {
            level: Level::Beginner,
            progress_percent: percent(km, INTERMEDIATE_KM),
        }
    }
}

fn percent(done: f64, span: f64) -> u8 {
    ((done / span) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Numeric rider tier (1-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiderTier(u8);

impl RiderTier {
    /// Tier thresholds in km, highest first.
    const THRESHOLDS: [(f64, u8); 4] = [(100.0, 5), (50.0, 4), (25.0, 3), (10.0, 2)];

    pub fn for_distance(total_km: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(km, _)| total_km >= *km)
            .map(|&(_, tier)| RiderTier(tier))
            .unwrap_or(RiderTier(1))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}
