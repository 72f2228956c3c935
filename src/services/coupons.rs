//! Coupon validation
//!
//! The service owns the contract shape: codes are trimmed and uppercased,
//! locally screened, then resolved in one store lookup that also enforces
//! expiry and usage limits. Rejections are values, and an invalid code
//! never carries a discount.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::AppResult,
    models::{CouponRejection, CouponValidation},
    store::{CouponLookup, CouponStore},
};

/// Accepted code alphabet after normalization
static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9-]{3,32}$").expect("invalid coupon code pattern"));

#[derive(Clone)]
pub struct CouponsService {
    store: Arc<dyn CouponStore>,
}

impl CouponsService {
    pub fn new(store: Arc<dyn CouponStore>) -> Self {
        Self { store }
    }

    /// Normalize a raw code: trimmed, uppercased
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    /// Validate a raw code against the store.
    ///
    /// Re-validating the same code against unchanged store state yields the
    /// same answer, so session-level re-application is idempotent.
    pub async fn validate(&self, raw_code: &str) -> AppResult<CouponValidation> {
        let code = Self::normalize(raw_code);
        if code.is_empty() {
            return Ok(CouponValidation::rejected(CouponRejection::EmptyCode));
        }
        if !CODE_PATTERN.is_match(&code) {
            return Ok(CouponValidation::rejected(CouponRejection::MalformedCode));
        }

        let validation = match self.store.lookup(&code).await? {
            CouponLookup::Found(coupon) => CouponValidation::accepted(&coupon),
            CouponLookup::NotFound => CouponValidation::rejected(CouponRejection::NotFound),
            CouponLookup::Expired => CouponValidation::rejected(CouponRejection::Expired),
            CouponLookup::Exhausted => {
                CouponValidation::rejected(CouponRejection::UsageLimitReached)
            }
        };

        if !validation.is_valid() {
            tracing::debug!(%code, ?validation, "coupon rejected");
        }
        Ok(validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coupon;
    use crate::store::MockCouponStore;
    use rust_decimal::Decimal;

    fn service_with(lookup: CouponLookup) -> CouponsService {
        let mut store = MockCouponStore::new();
        store
            .expect_lookup()
            .returning(move |_| Ok(lookup.clone()));
        CouponsService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn valid_code_carries_the_coupon_discount() {
        let coupon = Coupon {
            id: 7,
            code: "SUMMER-10".into(),
            discount_percent: Decimal::from(10),
        };
        let service = service_with(CouponLookup::Found(coupon));

        let validation = service.validate("  summer-10 ").await.unwrap();
        assert!(validation.is_valid());
        assert_eq!(validation.discount_percent(), Decimal::from(10));
        match validation {
            CouponValidation::Valid { coupon_id, code, .. } => {
                assert_eq!(coupon_id, 7);
                assert_eq!(code, "SUMMER-10");
            }
            CouponValidation::Invalid { .. } => unreachable!(),
        }
    }

    #[tokio::test]
    async fn empty_code_is_rejected_before_the_store() {
        let mut store = MockCouponStore::new();
        store.expect_lookup().never();
        let service = CouponsService::new(Arc::new(store));

        let validation = service.validate("   ").await.unwrap();
        assert!(!validation.is_valid());
        assert_eq!(validation.discount_percent(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn malformed_code_is_rejected_before_the_store() {
        let mut store = MockCouponStore::new();
        store.expect_lookup().never();
        let service = CouponsService::new(Arc::new(store));

        let validation = service.validate("no spaces allowed").await.unwrap();
        match validation {
            CouponValidation::Invalid { reason, .. } => {
                assert_eq!(reason, CouponRejection::MalformedCode)
            }
            CouponValidation::Valid { .. } => unreachable!(),
        }
    }

    #[tokio::test]
    async fn expired_and_exhausted_codes_carry_no_discount() {
        for (lookup, reason) in [
            (CouponLookup::Expired, CouponRejection::Expired),
            (CouponLookup::Exhausted, CouponRejection::UsageLimitReached),
            (CouponLookup::NotFound, CouponRejection::NotFound),
        ] {
            let service = service_with(lookup);
            let validation = service.validate("SUMMER-10").await.unwrap();
            assert_eq!(validation.discount_percent(), Decimal::ZERO);
            match validation {
                CouponValidation::Invalid { reason: got, .. } => assert_eq!(got, reason),
                CouponValidation::Valid { .. } => unreachable!(),
            }
        }
    }

    #[tokio::test]
    async fn revalidating_the_same_code_is_idempotent() {
        let coupon = Coupon {
            id: 7,
            code: "SUMMER-10".into(),
            discount_percent: Decimal::from(10),
        };
        let service = service_with(CouponLookup::Found(coupon));

        let first = service.validate("SUMMER-10").await.unwrap();
        let second = service.validate("SUMMER-10").await.unwrap();
        assert_eq!(first.discount_percent(), second.discount_percent());
        assert!(first.is_valid() && second.is_valid());
    }
}
