//! Database layer (local key-value store).

pub mod local_store;

pub use local_store::{LocalStore, StoreError};

/// Per-identity snapshot keys.
pub mod keys {
    /// Goal list snapshot
    pub fn goals(email: &str) -> String {
        format!("goals_{}", email)
    }

    /// Unlocked reward identifiers
    pub fn unlocked_rewards(email: &str) -> String {
        format!("coupons_{}", email)
    }

    /// Coupon catalog with redemption state
    pub fn coupon_list(email: &str) -> String {
        format!("couponsList_{}", email)
    }

    /// Totals, points, achievements and route history
    pub fn stats(email: &str) -> String {
        format!("stats_{}", email)
    }

    pub fn profile(email: &str) -> String {
        format!("profile_{}", email)
    }
}
