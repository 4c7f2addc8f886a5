// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Coupon catalog and redemption ledger.

use rand::Rng;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Prefix for every generated redemption code.
pub const CODE_PREFIX: &str = "BIKE";
/// Number of random characters after the prefix.
pub const CODE_SUFFIX_LEN: usize = 6;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_CODE_ATTEMPTS: usize = 16;

/// A catalog entry redeemable for points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coupon {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points_cost: u32,
    pub discount: String,
    pub store: String,
    pub unlocked: bool,
    pub redeemed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Coupon {
    fn new(
        id: &str,
        title: &str,
        description: &str,
        points_cost: u32,
        discount: &str,
        store: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            points_cost,
            discount: discount.to_string(),
            store: store.to_string(),
            unlocked: false,
            redeemed: false,
            code: None,
        }
    }
}

/// The fixed coupon catalog every rider starts from.
pub fn default_coupons() -> Vec<Coupon> {
    vec![
        Coupon::new(
            "c1",
            "10% OFF BikeShop",
            "10% off any product",
            100,
            "10%",
            "BikeShop",
        ),
        Coupon::new(
            "c2",
            "$50 OFF CicloStore",
            "$50 off purchases over $200",
            250,
            "$50",
            "CicloStore",
        ),
        Coupon::new(
            "c3",
            "15% OFF Accessories",
            "15% off accessories",
            150,
            "15%",
            "BikeMania",
        ),
        Coupon::new(
            "c4",
            "Free Shipping",
            "Free shipping on any purchase",
            80,
            "Free shipping",
            "All stores",
        ),
        Coupon::new(
            "c5",
            "20% OFF Parts",
            "20% off bike parts",
            200,
            "20%",
            "PedalPro",
        ),
        Coupon::new(
            "c6",
            "$100 OFF Premium",
            "$100 off purchases over $500",
            500,
            "$100",
            "BikeShop Premium",
        ),
    ]
}

/// A rider's copy of the coupon catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponLedger {
    coupons: Vec<Coupon>,
}

impl Default for CouponLedger {
    fn default() -> Self {
        Self::new(default_coupons())
    }
}

impl CouponLedger {
    pub fn new(coupons: Vec<Coupon>) -> Self {
        Self { coupons }
    }

    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    pub fn get(&self, coupon_id: &str) -> Option<&Coupon> {
        self.coupons.iter().find(|c| c.id == coupon_id)
    }

    /// Redeem a coupon against an available point balance.
    ///
    /// Returns `false` without touching the ledger if the coupon does not
    /// exist, is already redeemed, or costs more than `available_points`.
    /// Deducting the points is the caller's job.
    pub fn redeem(&mut self, coupon_id: &str, available_points: u64) -> bool {
        self.redeem_with(coupon_id, available_points, &mut rand::thread_rng())
    }

    /// Same as [`redeem`](Self::redeem) with an explicit random source.
    pub fn redeem_with<R: Rng>(
        &mut self,
        coupon_id: &str,
        available_points: u64,
        rng: &mut R,
    ) -> bool {
        let Some(idx) = self.coupons.iter().position(|c| c.id == coupon_id) else {
            tracing::debug!(coupon_id, "Redeem requested for unknown coupon");
            return false;
        };

        let coupon = &self.coupons[idx];
        if coupon.redeemed {
            tracing::debug!(coupon_id, "Coupon already redeemed");
            return false;
        }
        if available_points < u64::from(coupon.points_cost) {
            tracing::debug!(
                coupon_id,
                available_points,
                points_cost = coupon.points_cost,
                "Insufficient points for coupon"
            );
            return false;
        }

        let code = self.unique_code(rng);
        let coupon = &mut self.coupons[idx];
        coupon.unlocked = true;
        coupon.redeemed = true;
        coupon.code = Some(code);

        tracing::info!(coupon_id, points_cost = coupon.points_cost, "Coupon redeemed");
        true
    }

    /// Generate a code not already issued by this ledger.
    ///
    /// Codes are not checked against other riders' ledgers.
    fn unique_code<R: Rng>(&self, rng: &mut R) -> String {
        let mut code = generate_code(rng);
        for _ in 1..MAX_CODE_ATTEMPTS {
            if !self.coupons.iter().any(|c| c.code.as_deref() == Some(code.as_str())) {
                break;
            }
            code = generate_code(rng);
        }
        code
    }
}

/// Generate a redemption code: [`CODE_PREFIX`] followed by
/// [`CODE_SUFFIX_LEN`] uppercase alphanumerics.
pub fn generate_code<R: Rng>(rng: &mut R) -> String {
    let suffix: String = (0..CODE_SUFFIX_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", CODE_PREFIX, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ledger_with_cost(cost: u32) -> CouponLedger {
        CouponLedger::new(vec![Coupon::new("x", "X", "x", cost, "10%", "Shop")])
    }

    fn is_valid_code(code: &str) -> bool {
        code.len() == CODE_PREFIX.len() + CODE_SUFFIX_LEN
            && code.starts_with(CODE_PREFIX)
            && code[CODE_PREFIX.len()..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }

    #[test]
    fn test_redeem_insufficient_points() {
        let mut ledger = ledger_with_cost(100);
        let before = ledger.clone();

        assert!(!ledger.redeem("x", 80));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_redeem_success_generates_code() {
        let mut ledger = ledger_with_cost(100);

        assert!(ledger.redeem("x", 150));

        let coupon = ledger.get("x").unwrap();
        assert!(coupon.redeemed);
        assert!(coupon.unlocked);
        let code = coupon.code.as_deref().unwrap();
        assert!(is_valid_code(code), "bad code {}", code);
    }

    #[test]
    fn test_redeem_exact_balance() {
        let mut ledger = ledger_with_cost(100);
        assert!(ledger.redeem("x", 100));
    }

    #[test]
    fn test_redeem_is_irreversible() {
        let mut ledger = ledger_with_cost(100);
        assert!(ledger.redeem("x", 1_000));
        let after_first = ledger.clone();

        assert!(!ledger.redeem("x", 1_000));
        assert_eq!(ledger, after_first);
    }

    #[test]
    fn test_redeem_unknown_coupon() {
        let mut ledger = CouponLedger::default();
        let before = ledger.clone();
        assert!(!ledger.redeem("nope", u64::MAX));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_generate_code_format() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(is_valid_code(&generate_code(&mut rng)));
        }
    }

    #[test]
    fn test_codes_unique_within_ledger() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut ledger = CouponLedger::default();
        for coupon in default_coupons() {
            assert!(ledger.redeem_with(&coupon.id, 10_000, &mut rng));
        }
        let mut codes: Vec<_> = ledger
            .coupons()
            .iter()
            .filter_map(|c| c.code.clone())
            .collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), default_coupons().len());
    }

    #[test]
    fn test_default_catalog_costs() {
        let costs: Vec<u32> = default_coupons().iter().map(|c| c.points_cost).collect();
        assert_eq!(costs, vec![100, 250, 150, 80, 200, 500]);
    }

    #[test]
    fn test_ledger_serializes_as_list() {
        let ledger = ledger_with_cost(10);
        let json = serde_json::to_value(&ledger).unwrap();
        assert!(json.is_array());
        assert!(json[0].get("code").is_none());
    }
}
