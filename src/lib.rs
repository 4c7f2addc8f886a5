// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Pedal-Tracker: rewards for riding instead of driving
//!
//! This crate provides the backend API that turns finished bike routes into
//! levels, goal rewards, points and redeemable coupons.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::ProgressService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub progress: ProgressService,
}
