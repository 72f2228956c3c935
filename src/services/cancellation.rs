//! Cancellation fee computation
//!
//! Tiers model "the earlier you cancel, the less you forfeit". A
//! cancellation below every configured tier forfeits the full price; that
//! fallback is fixed, not a configurable rule.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::CancellationPolicy,
    services::pricing::round_currency,
};

/// Fee owed on cancellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub fee: Decimal,
    pub fee_percent: Decimal,
    /// Whole days between the cancellation day and the booking date;
    /// negative for past bookings
    pub days_until: i64,
}

/// Compute the cancellation fee as of `today`.
pub fn compute_fee(
    today: NaiveDate,
    booking_date: NaiveDate,
    total_price: Decimal,
    policy: &CancellationPolicy,
) -> AppResult<FeeBreakdown> {
    if total_price.is_sign_negative() {
        return Err(AppError::Validation(format!(
            "total price must not be negative: {}",
            total_price
        )));
    }
    for rule in policy.rules() {
        rule.validate()
            .map_err(|e| AppError::Validation(format!("invalid cancellation rule: {}", e)))?;
    }

    let days_until = (booking_date - today).num_days();
    let fee_percent = policy.fee_percent_for(days_until);
    let fee = round_currency(total_price * fee_percent / Decimal::ONE_HUNDRED);

    Ok(FeeBreakdown { fee, fee_percent, days_until })
}

/// As [`compute_fee`], with `today` taken from the wall clock
pub fn compute_fee_now(
    booking_date: NaiveDate,
    total_price: Decimal,
    policy: &CancellationPolicy,
) -> AppResult<FeeBreakdown> {
    compute_fee(Utc::now().date_naive(), booking_date, total_price, policy)
}
