//! Bookable time slot templates

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named, fixed-duration bookable window (e.g. "Morning, 09:00-12:00"),
/// independent of specific dates. Inactive slots are never offered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: i32,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_hours: u32,
    pub base_price: Decimal,
    pub is_active: bool,
}

impl TimeSlot {
    /// The slot's concrete interval on a given date, half-open `[start, end)`
    pub fn interval_on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (date.and_time(self.start_time), date.and_time(self.end_time))
    }

    /// Whether the slot fits inside the `[open, close)` window
    pub fn fits_within(&self, open: NaiveTime, close: NaiveTime) -> bool {
        open <= self.start_time && self.end_time <= close
    }
}
