//! Schedule models (weekly opening hours, special dates, internal blocks)

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ---------------------------------------------------------------------------
// OpeningHours
// ---------------------------------------------------------------------------

/// Default opening hours for one weekday
///
/// At most one record per weekday is authoritative; the calculator uses the
/// first match.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpeningHours {
    /// Day of week (0=Monday, 6=Sunday)
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: u8,
    /// Opening time
    pub open_time: NaiveTime,
    /// Closing time
    pub close_time: NaiveTime,
    /// Studio is closed all day on this weekday
    pub is_closed: bool,
}

impl OpeningHours {
    pub fn new(day_of_week: u8, open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            day_of_week,
            open_time,
            close_time,
            is_closed: false,
        }
    }

    pub fn closed(day_of_week: u8) -> Self {
        Self {
            day_of_week,
            open_time: NaiveTime::MIN,
            close_time: NaiveTime::MIN,
            is_closed: true,
        }
    }
}

// ---------------------------------------------------------------------------
// SpecialDate
// ---------------------------------------------------------------------------

/// Kind of special date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialDateKind {
    Holiday,
    Closed,
    CustomHours,
}

/// A calendar day overriding the weekly opening hours
///
/// `Holiday` and `Closed` force full-day unavailability. `CustomHours`
/// replaces the weekday open/close times with `open_time`/`close_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialDate {
    pub date: NaiveDate,
    pub kind: SpecialDateKind,
    /// Display name (e.g. holiday name)
    pub name: Option<String>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
}

impl SpecialDate {
    pub fn holiday(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            kind: SpecialDateKind::Holiday,
            name: Some(name.into()),
            open_time: None,
            close_time: None,
        }
    }

    pub fn closed(date: NaiveDate, name: Option<String>) -> Self {
        Self {
            date,
            kind: SpecialDateKind::Closed,
            name,
            open_time: None,
            close_time: None,
        }
    }

    pub fn custom_hours(date: NaiveDate, open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            date,
            kind: SpecialDateKind::CustomHours,
            name: None,
            open_time: Some(open_time),
            close_time: Some(close_time),
        }
    }

    /// True when this date forces full-day unavailability
    pub fn closes_all_day(&self) -> bool {
        matches!(self.kind, SpecialDateKind::Holiday | SpecialDateKind::Closed)
    }
}

// ---------------------------------------------------------------------------
// InternalBlock
// ---------------------------------------------------------------------------

/// An admin-created blackout interval (e.g. maintenance)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub reason: Option<String>,
}

impl InternalBlock {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end, reason: None }
    }

    /// Whether the block overlaps the half-open interval `[start, end)`.
    ///
    /// Covers all three overlap shapes: interval start inside the block,
    /// interval end inside the block, or the block nested inside the
    /// interval.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && self.end > start
    }
}
