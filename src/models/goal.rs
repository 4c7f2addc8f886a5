// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Goals and the per-rider goal board.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Goal identifiers used by the route fan-out.
pub mod ids {
    pub const DISTANCE: &str = "km";
    pub const CO2: &str = "co2";
    pub const RIDES: &str = "rides";
    pub const LONG_RIDE: &str = "long_ride";
}

/// A single ride at least this long counts toward the long-ride goal.
pub const LONG_RIDE_KM: f64 = 50.0;

/// A named progress target with a single reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: f64,
    /// Always within `0..=target`.
    pub current: f64,
    pub achieved: bool,
    /// Reward identifier unlocked when the goal is first achieved.
    pub reward: String,
    pub unit: String,
}

impl Goal {
    fn new(id: &str, title: &str, description: &str, target: f64, reward: &str, unit: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            target,
            current: 0.0,
            achieved: false,
            reward: reward.to_string(),
            unit: unit.to_string(),
        }
    }

    /// Completion percentage (0-100) for display.
    pub fn percent(&self) -> u8 {
        ((self.current / self.target) * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// The fixed goal catalog every rider starts from.
pub fn default_goals() -> Vec<Goal> {
    vec![
        Goal::new(
            ids::DISTANCE,
            "100 km ridden",
            "Ride 100 km in total",
            100.0,
            "10% discount coupon",
            "km",
        ),
        Goal::new(
            ids::CO2,
            "10 kg of CO₂ saved",
            "Save 10 kg of CO₂ by riding instead of driving",
            10.0,
            "Free shipping coupon",
            "kg",
        ),
        Goal::new(
            ids::RIDES,
            "20 routes finished",
            "Finish 20 bike routes",
            20.0,
            "20% OFF coupon",
            "routes",
        ),
        Goal::new(
            ids::LONG_RIDE,
            "50 km in a single ride",
            "Complete a single route of at least 50 km",
            1.0,
            "Special adventure coupon",
            "times",
        ),
    ]
}

/// One entry of a batched progress update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalIncrement {
    pub goal_id: String,
    pub value: f64,
}

impl GoalIncrement {
    pub fn new(goal_id: &str, value: f64) -> Self {
        Self {
            goal_id: goal_id.to_string(),
            value,
        }
    }
}

/// A rider's goals plus the rewards they have unlocked so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalBoard {
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub unlocked_rewards: Vec<String>,
}

impl Default for GoalBoard {
    fn default() -> Self {
        Self {
            goals: default_goals(),
            unlocked_rewards: Vec::new(),
        }
    }
}

impl GoalBoard {
    /// Build a board from previously stored parts.
    pub fn from_parts(goals: Vec<Goal>, unlocked_rewards: Vec<String>) -> Self {
        Self {
            goals,
            unlocked_rewards,
        }
    }

    pub fn get(&self, goal_id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    /// Add `value` to a goal, saturating at its target.
    ///
    /// Returns the reward if this call moved the goal to achieved.
    /// Unknown goal ids are ignored. Negative or non-finite values count as 0.
    pub fn add_progress(&mut self, goal_id: &str, value: f64) -> Option<String> {
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == goal_id) else {
            tracing::debug!(goal_id, "Ignoring progress for unknown goal");
            return None;
        };

        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        let was_achieved = goal.achieved;

        goal.current = (goal.current + value).min(goal.target);
        goal.achieved = goal.current >= goal.target;

        if goal.achieved && !was_achieved {
            let reward = goal.reward.clone();
            self.unlocked_rewards.push(reward.clone());
            tracing::info!(goal_id, reward = %reward, "Goal achieved");
            Some(reward)
        } else {
            None
        }
    }

    /// Apply each increment in order. Returns every reward unlocked on the way.
    pub fn add_progress_multi(&mut self, entries: &[GoalIncrement]) -> Vec<String> {
        entries
            .iter()
            .filter_map(|e| self.add_progress(&e.goal_id, e.value))
            .collect()
    }
}
