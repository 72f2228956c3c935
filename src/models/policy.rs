//! Booking window and cancellation policy models

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

// ---------------------------------------------------------------------------
// BookingWindow
// ---------------------------------------------------------------------------

/// Global constraint on how near-term or far ahead a date may be booked,
/// expressed in days from today. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BookingWindow {
    pub min_days_ahead: i64,
    pub max_days_ahead: i64,
}

impl BookingWindow {
    pub fn new(min_days_ahead: i64, max_days_ahead: i64) -> Self {
        Self { min_days_ahead, max_days_ahead }
    }

    /// True iff `today + min <= date <= today + max`
    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        let offset = (date - today).num_days();
        self.min_days_ahead <= offset && offset <= self.max_days_ahead
    }

    /// First bookable date
    pub fn earliest(&self, today: NaiveDate) -> NaiveDate {
        add_days(today, self.min_days_ahead)
    }

    /// Last bookable date
    pub fn latest(&self, today: NaiveDate) -> NaiveDate {
        add_days(today, self.max_days_ahead)
    }
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64)).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs())).unwrap_or(NaiveDate::MIN)
    }
}

// ---------------------------------------------------------------------------
// CancellationRule / CancellationPolicy
// ---------------------------------------------------------------------------

/// One cancellation tier: cancelling at least `days_before` days ahead of
/// the booking date forfeits `fee_percent` of the total price.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CancellationRule {
    pub days_before: i64,
    #[validate(range(min = 0, max = 100))]
    pub fee_percent: u32,
}

impl CancellationRule {
    pub fn new(days_before: i64, fee_percent: u32) -> Self {
        Self { days_before, fee_percent }
    }
}

/// An ordered set of cancellation tiers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancellationPolicy {
    rules: Vec<CancellationRule>,
}

impl CancellationPolicy {
    pub fn new(rules: Vec<CancellationRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[CancellationRule] {
        &self.rules
    }

    /// The applicable fee percentage for a cancellation `days_until` days
    /// before the booking date.
    ///
    /// Tiers are scanned by threshold, highest first; the first tier whose
    /// `days_before` is within `days_until` wins. Below every configured
    /// tier the full price is forfeited.
    pub fn fee_percent_for(&self, days_until: i64) -> Decimal {
        let mut sorted: Vec<&CancellationRule> = self.rules.iter().collect();
        sorted.sort_by(|a, b| b.days_before.cmp(&a.days_before));

        sorted
            .into_iter()
            .find(|rule| rule.days_before <= days_until)
            .map(|rule| Decimal::from(rule.fee_percent))
            .unwrap_or(Decimal::ONE_HUNDRED)
    }
}
