//! Store boundary: snapshot contracts the engine consumes
//!
//! The engine never performs I/O itself; it is handed an immutable
//! [`CalendarFacts`] snapshot covering the queried date range. The traits
//! here are the seams a real persistence layer plugs into. Availability
//! checks over a snapshot are advisory only; the store behind
//! [`CalendarFactsStore::insert_booking`] owns the authoritative
//! at-most-one-live-booking-per-(date, slot) guarantee.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{Booking, Coupon, InternalBlock, OpeningHours, SpecialDate, TimeSlot},
};

/// Immutable snapshot of everything availability resolution needs for a
/// date range
#[derive(Debug, Clone, Default)]
pub struct CalendarFacts {
    pub opening_hours: Vec<OpeningHours>,
    pub special_dates: Vec<SpecialDate>,
    pub time_slots: Vec<TimeSlot>,
    pub internal_blocks: Vec<InternalBlock>,
    pub bookings: Vec<Booking>,
}

/// Outcome of the store's atomic conditional insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    /// Another live booking already holds the (date, slot) pair. Callers
    /// treat this as a normal "slot no longer available" result.
    SlotTaken,
}

/// Read access to the calendar facts, keyed by date range
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarFactsStore: Send + Sync {
    /// Load a consistent snapshot for `[from, to]` (inclusive)
    async fn load_facts(&self, from: NaiveDate, to: NaiveDate) -> AppResult<CalendarFacts>;

    /// Atomic check-and-insert keyed by (booking_date, time_slot_id).
    /// A conflict is the authoritative availability answer, not a fault.
    async fn insert_booking(&self, booking: Booking) -> AppResult<InsertOutcome>;
}

/// What the coupon store resolved a normalized code to.
///
/// Expiry and usage-count enforcement live here, behind the store, in the
/// same lookup that resolves the code.
#[derive(Debug, Clone)]
pub enum CouponLookup {
    Found(Coupon),
    NotFound,
    Expired,
    Exhausted,
}

/// Coupon resolution, delegated to the persistence layer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Resolve a normalized (trimmed, uppercased) code
    async fn lookup(&self, code: &str) -> AppResult<CouponLookup>;
}
