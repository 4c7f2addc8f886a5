// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Cumulative milestone achievements.

/// What an achievement threshold is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    DistanceKm,
    Co2Kg,
    Rides,
}

struct Milestone {
    id: &'static str,
    metric: Metric,
    threshold: f64,
}

const MILESTONES: &[Milestone] = &[
    Milestone {
        id: "10km",
        metric: Metric::DistanceKm,
        threshold: 10.0,
    },
    Milestone {
        id: "50km",
        metric: Metric::DistanceKm,
        threshold: 50.0,
    },
    Milestone {
        id: "100km",
        metric: Metric::DistanceKm,
        threshold: 100.0,
    },
    Milestone {
        id: "500km",
        metric: Metric::DistanceKm,
        threshold: 500.0,
    },
    Milestone {
        id: "1000km",
        metric: Metric::DistanceKm,
        threshold: 1000.0,
    },
    Milestone {
        id: "eco_guardian",
        metric: Metric::Co2Kg,
        threshold: 5.0,
    },
    Milestone {
        id: "eco_hero",
        metric: Metric::Co2Kg,
        threshold: 50.0,
    },
    Milestone {
        id: "five_routes",
        metric: Metric::Rides,
        threshold: 5.0,
    },
    Milestone {
        id: "monthly_cyclist",
        metric: Metric::Rides,
        threshold: 30.0,
    },
];

/// All achievements earned at the given totals, in catalog order.
pub fn earned(total_km: f64, total_co2_kg: f64, rides: u32) -> Vec<&'static str> {
    MILESTONES
        .iter()
        .filter(|m| {
            let value = match m.metric {
                Metric::DistanceKm => total_km,
                Metric::Co2Kg => total_co2_kg,
                Metric::Rides => f64::from(rides),
            };
            value >= m.threshold
        })
        .map(|m| m.id)
        .collect()
}
