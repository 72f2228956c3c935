//! Coupon model and the validation contract shape

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A discount coupon
///
/// Validity and usage constraints (expiry, usage count) are enforced by the
/// coupon store; the engine only defines the validation contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: i32,
    pub code: String,
    pub discount_percent: Decimal,
}

/// Why a coupon code was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponRejection {
    EmptyCode,
    MalformedCode,
    NotFound,
    Expired,
    UsageLimitReached,
}

impl std::fmt::Display for CouponRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CouponRejection::EmptyCode => "No coupon code entered",
            CouponRejection::MalformedCode => "Coupon code format is invalid",
            CouponRejection::NotFound => "Unknown coupon code",
            CouponRejection::Expired => "This coupon has expired",
            CouponRejection::UsageLimitReached => "This coupon has reached its usage limit",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of validating a coupon code
///
/// Serialises to `{valid: true, coupon_id, code, discount_percent}` or
/// `{valid: false, reason}`. An invalid or absent code never carries a
/// discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CouponValidation {
    Valid {
        valid: bool,
        coupon_id: i32,
        code: String,
        discount_percent: Decimal,
    },
    Invalid { valid: bool, reason: CouponRejection },
}

impl CouponValidation {
    pub fn accepted(coupon: &Coupon) -> Self {
        CouponValidation::Valid {
            valid: true,
            coupon_id: coupon.id,
            code: coupon.code.clone(),
            discount_percent: coupon.discount_percent,
        }
    }

    pub fn rejected(reason: CouponRejection) -> Self {
        CouponValidation::Invalid { valid: false, reason }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, CouponValidation::Valid { .. })
    }

    /// The discount to apply; zero unless the validation succeeded
    pub fn discount_percent(&self) -> Decimal {
        match self {
            CouponValidation::Valid { discount_percent, .. } => *discount_percent,
            CouponValidation::Invalid { .. } => Decimal::ZERO,
        }
    }
}
