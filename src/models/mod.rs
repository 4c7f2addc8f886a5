// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod achievement;
pub mod coupon;
pub mod goal;
pub mod level;
pub mod route;
pub mod stats;
pub mod user;

pub use coupon::{Coupon, CouponLedger};
pub use goal::{Goal, GoalBoard, GoalIncrement};
pub use level::{compute_level, Level, LevelProgress, RiderTier};
pub use route::{RouteCompletion, RouteRecord, TravelMode};
pub use stats::{StatsError, UserStats};
pub use user::{ProfileBuilder, UserProfile};
