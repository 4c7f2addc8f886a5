//! Rider profile model.

use serde::{Deserialize, Serialize};

/// Rider profile stored per identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Email address (identity key for all per-rider snapshots)
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Body weight in kg, as entered by the rider
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// When the rider was first seen (ISO 8601)
    #[serde(default)]
    pub created_at: String,
}

impl UserProfile {
    pub fn builder(email: impl Into<String>) -> ProfileBuilder {
        ProfileBuilder::new(email)
    }
}

/// Builder for [`UserProfile`].
///
/// Only the email is required. Defaults:
/// - `name`: empty string
/// - `weight_kg`: `None`
/// - `created_at`: the current time
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    email: String,
    name: String,
    weight_kg: Option<f64>,
    created_at: Option<String>,
}

impl ProfileBuilder {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: String::new(),
            weight_kg: None,
            created_at: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Non-positive or non-finite weights are dropped.
    pub fn weight_kg(mut self, weight_kg: Option<f64>) -> Self {
        self.weight_kg = weight_kg.filter(|w| w.is_finite() && *w > 0.0);
        self
    }

    pub fn created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn build(self) -> UserProfile {
        UserProfile {
            email: self.email,
            name: self.name,
            weight_kg: self.weight_kg,
            created_at: self
                .created_at
                .unwrap_or_else(crate::time_utils::now_rfc3339),
        }
    }
}
