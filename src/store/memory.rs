//! In-memory store implementation
//!
//! Backs the test suite and lets embedders run the engine without a
//! database. The booking list sits behind a mutex so the conditional
//! insert really is check-and-insert in one step.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{Booking, Coupon, InternalBlock, OpeningHours, SpecialDate, TimeSlot},
};

use super::{CalendarFacts, CalendarFactsStore, CouponLookup, CouponStore, InsertOutcome};

/// In-memory calendar facts plus the live booking list
#[derive(Clone, Default)]
pub struct MemoryStore {
    opening_hours: Vec<OpeningHours>,
    special_dates: Vec<SpecialDate>,
    time_slots: Vec<TimeSlot>,
    internal_blocks: Vec<InternalBlock>,
    bookings: Arc<Mutex<Vec<Booking>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_opening_hours(mut self, hours: Vec<OpeningHours>) -> Self {
        self.opening_hours = hours;
        self
    }

    pub fn with_special_dates(mut self, dates: Vec<SpecialDate>) -> Self {
        self.special_dates = dates;
        self
    }

    pub fn with_time_slots(mut self, slots: Vec<TimeSlot>) -> Self {
        self.time_slots = slots;
        self
    }

    pub fn with_internal_blocks(mut self, blocks: Vec<InternalBlock>) -> Self {
        self.internal_blocks = blocks;
        self
    }

    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        *self.bookings.lock().expect("bookings lock poisoned") = bookings;
        self
    }

    fn lock_bookings(&self) -> AppResult<std::sync::MutexGuard<'_, Vec<Booking>>> {
        self.bookings
            .lock()
            .map_err(|_| AppError::Store("bookings lock poisoned".into()))
    }
}

#[async_trait]
impl CalendarFactsStore for MemoryStore {
    async fn load_facts(&self, from: NaiveDate, to: NaiveDate) -> AppResult<CalendarFacts> {
        let bookings = self.lock_bookings()?;
        Ok(CalendarFacts {
            opening_hours: self.opening_hours.clone(),
            special_dates: self
                .special_dates
                .iter()
                .filter(|s| from <= s.date && s.date <= to)
                .cloned()
                .collect(),
            time_slots: self.time_slots.clone(),
            internal_blocks: self
                .internal_blocks
                .iter()
                .filter(|b| b.start.date() <= to && b.end.date() >= from)
                .cloned()
                .collect(),
            bookings: bookings
                .iter()
                .filter(|b| from <= b.booking_date && b.booking_date <= to)
                .cloned()
                .collect(),
        })
    }

    async fn insert_booking(&self, booking: Booking) -> AppResult<InsertOutcome> {
        let mut bookings = self.lock_bookings()?;
        let taken = bookings
            .iter()
            .any(|b| b.occupies(booking.booking_date, booking.time_slot_id));
        if taken {
            return Ok(InsertOutcome::SlotTaken);
        }
        bookings.push(booking);
        Ok(InsertOutcome::Created)
    }
}

/// In-memory coupon catalog with per-coupon expiry and usage bookkeeping
#[derive(Clone, Default)]
pub struct MemoryCouponStore {
    entries: Arc<Mutex<Vec<CouponEntry>>>,
    today: NaiveDate,
}

#[derive(Clone)]
struct CouponEntry {
    coupon: Coupon,
    valid_until: Option<NaiveDate>,
    max_uses: Option<u32>,
    use_count: u32,
}

impl MemoryCouponStore {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            today,
        }
    }

    pub fn add(
        &self,
        coupon: Coupon,
        valid_until: Option<NaiveDate>,
        max_uses: Option<u32>,
    ) {
        self.entries
            .lock()
            .expect("coupon lock poisoned")
            .push(CouponEntry { coupon, valid_until, max_uses, use_count: 0 });
    }

    /// Record a redemption (the booking flow calls this after commit)
    pub fn record_use(&self, coupon_id: i32) {
        let mut entries = self.entries.lock().expect("coupon lock poisoned");
        if let Some(entry) = entries.iter_mut().find(|e| e.coupon.id == coupon_id) {
            entry.use_count += 1;
        }
    }
}

#[async_trait]
impl CouponStore for MemoryCouponStore {
    async fn lookup(&self, code: &str) -> AppResult<CouponLookup> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Store("coupon lock poisoned".into()))?;

        let Some(entry) = entries.iter().find(|e| e.coupon.code == code) else {
            return Ok(CouponLookup::NotFound);
        };
        if entry.valid_until.is_some_and(|until| until < self.today) {
            return Ok(CouponLookup::Expired);
        }
        if entry.max_uses.is_some_and(|max| entry.use_count >= max) {
            return Ok(CouponLookup::Exhausted);
        }
        Ok(CouponLookup::Found(entry.coupon.clone()))
    }
}
