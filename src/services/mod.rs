// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod estimates;
pub mod progress;

pub use progress::{ProgressService, RedeemOutcome, RiderState, RouteOutcome};
