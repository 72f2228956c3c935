//! Availability resolution
//!
//! [`AvailabilityCalculator`] is a pure value object over a calendar facts
//! snapshot: it answers "is this slot bookable on this date?" and aggregates
//! per-day results for calendar rendering. [`AvailabilityService`] layers
//! snapshot loading and the pre-commit re-check on top of a facts store.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Booking, BookingStatus, BookingWindow, OpeningHours, SpecialDate, TimeSlot,
    },
    store::{CalendarFacts, CalendarFactsStore, InsertOutcome},
};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

/// Why a (date, slot) pair cannot be booked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    OutsideBookingWindow,
    AlreadyBooked,
    BlockedInternally,
    ClosedOnWeekday,
    ClosedSpecialDate { name: Option<String> },
    OutsideOpeningHours,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::OutsideBookingWindow => {
                write!(f, "This date is outside the bookable period")
            }
            RejectionReason::AlreadyBooked => write!(f, "This slot is already booked"),
            RejectionReason::BlockedInternally => {
                write!(f, "This slot is blocked for internal use")
            }
            RejectionReason::ClosedOnWeekday => write!(f, "The studio is closed on this day"),
            RejectionReason::ClosedSpecialDate { name: Some(name) } => {
                write!(f, "The studio is closed ({})", name)
            }
            RejectionReason::ClosedSpecialDate { name: None } => {
                write!(f, "The studio is closed on this date")
            }
            RejectionReason::OutsideOpeningHours => {
                write!(f, "This slot falls outside the opening hours")
            }
        }
    }
}

/// Per-slot availability answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotVerdict {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
}

impl SlotVerdict {
    fn available() -> Self {
        Self { available: true, reason: None }
    }

    fn rejected(reason: RejectionReason) -> Self {
        Self { available: false, reason: Some(reason) }
    }
}

/// Aggregated availability for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub is_open: bool,
    pub is_holiday: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_name: Option<String>,
    pub available_slots: Vec<TimeSlot>,
}

impl DayAvailability {
    fn closed(date: NaiveDate, is_holiday: bool, holiday_name: Option<String>) -> Self {
        Self {
            date,
            is_open: false,
            is_holiday,
            holiday_name,
            available_slots: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// AvailabilityCalculator
// ---------------------------------------------------------------------------

/// One entry of the ordered check table: returns the rejection, or `None`
/// when the check passes.
type SlotCheck = fn(&AvailabilityCalculator, NaiveDate, &TimeSlot) -> Option<RejectionReason>;

/// The fixed evaluation order. First match wins, so the cheapest and most
/// actionable rejections surface before the opening-hours cross-checks.
const SLOT_CHECKS: [SlotCheck; 6] = [
    AvailabilityCalculator::check_booking_window,
    AvailabilityCalculator::check_already_booked,
    AvailabilityCalculator::check_internal_blocks,
    AvailabilityCalculator::check_weekday_hours,
    AvailabilityCalculator::check_special_date,
    AvailabilityCalculator::check_slot_fits_hours,
];

/// Pure availability resolution over an immutable facts snapshot.
///
/// `today` is the start of the current day in the studio's local time zone
/// and is injected by the caller, keeping the calculator clock-free.
pub struct AvailabilityCalculator {
    facts: CalendarFacts,
    window: BookingWindow,
    today: NaiveDate,
}

impl AvailabilityCalculator {
    pub fn new(facts: CalendarFacts, window: BookingWindow, today: NaiveDate) -> Self {
        Self { facts, window, today }
    }

    /// True iff `today + min_days_ahead <= date <= today + max_days_ahead`
    pub fn is_date_within_booking_window(&self, date: NaiveDate) -> bool {
        self.window.contains(self.today, date)
    }

    /// Run the ordered checks for one (date, slot) pair
    pub fn check_slot(&self, date: NaiveDate, slot: &TimeSlot) -> SlotVerdict {
        for check in SLOT_CHECKS {
            if let Some(reason) = check(self, date, slot) {
                tracing::debug!(%date, slot_id = slot.id, ?reason, "slot rejected");
                return SlotVerdict::rejected(reason);
            }
        }
        SlotVerdict::available()
    }

    /// Aggregate availability for one calendar day.
    ///
    /// Holidays, closed special dates and closed (or unconfigured) weekdays
    /// short-circuit to a closed day with no slots.
    pub fn day_availability(&self, date: NaiveDate) -> DayAvailability {
        if let Some(special) = self.special_date_on(date) {
            if special.closes_all_day() {
                return DayAvailability::closed(
                    date,
                    special.kind == crate::models::SpecialDateKind::Holiday,
                    special.name.clone(),
                );
            }
        }

        match self.weekday_hours(date) {
            None => return DayAvailability::closed(date, false, None),
            Some(hours) if hours.is_closed => return DayAvailability::closed(date, false, None),
            Some(_) => {}
        }

        let available_slots: Vec<TimeSlot> = self
            .facts
            .time_slots
            .iter()
            .filter(|slot| slot.is_active)
            .filter(|slot| self.check_slot(date, slot).available)
            .cloned()
            .collect();

        DayAvailability {
            date,
            is_open: !available_slots.is_empty(),
            is_holiday: false,
            holiday_name: None,
            available_slots,
        }
    }

    /// Availability for every day of a month, in ascending date order
    pub fn month_availability(&self, year: i32, month: u32) -> AppResult<Vec<DayAvailability>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::Validation(format!("invalid month: {}-{}", year, month)))?;

        let mut days = Vec::with_capacity(31);
        let mut date = first;
        while date.month() == month {
            days.push(self.day_availability(date));
            date = match date.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(days)
    }

    // ---- Ordered checks -------------------------------------------------

    fn check_booking_window(&self, date: NaiveDate, _slot: &TimeSlot) -> Option<RejectionReason> {
        (!self.is_date_within_booking_window(date)).then_some(RejectionReason::OutsideBookingWindow)
    }

    fn check_already_booked(&self, date: NaiveDate, slot: &TimeSlot) -> Option<RejectionReason> {
        self.facts
            .bookings
            .iter()
            .any(|b| b.occupies(date, slot.id))
            .then_some(RejectionReason::AlreadyBooked)
    }

    fn check_internal_blocks(&self, date: NaiveDate, slot: &TimeSlot) -> Option<RejectionReason> {
        let (start, end) = slot.interval_on(date);
        self.facts
            .internal_blocks
            .iter()
            .any(|block| block.overlaps(start, end))
            .then_some(RejectionReason::BlockedInternally)
    }

    fn check_weekday_hours(&self, date: NaiveDate, _slot: &TimeSlot) -> Option<RejectionReason> {
        match self.weekday_hours(date) {
            None => Some(RejectionReason::ClosedOnWeekday),
            Some(hours) if hours.is_closed => Some(RejectionReason::ClosedOnWeekday),
            Some(_) => None,
        }
    }

    fn check_special_date(&self, date: NaiveDate, _slot: &TimeSlot) -> Option<RejectionReason> {
        self.special_date_on(date)
            .filter(|special| special.closes_all_day())
            .map(|special| RejectionReason::ClosedSpecialDate { name: special.name.clone() })
    }

    fn check_slot_fits_hours(&self, date: NaiveDate, slot: &TimeSlot) -> Option<RejectionReason> {
        let (open, close) = self.effective_hours(date)?;
        (!slot.fits_within(open, close)).then_some(RejectionReason::OutsideOpeningHours)
    }

    // ---- Fact lookups ---------------------------------------------------

    fn weekday_hours(&self, date: NaiveDate) -> Option<&OpeningHours> {
        let weekday = date.weekday().num_days_from_monday() as u8;
        self.facts
            .opening_hours
            .iter()
            .find(|h| h.day_of_week == weekday)
    }

    fn special_date_on(&self, date: NaiveDate) -> Option<&SpecialDate> {
        self.facts.special_dates.iter().find(|s| s.date == date)
    }

    /// Effective open/close for a date: the special-date custom hours when
    /// present, otherwise the weekday defaults.
    fn effective_hours(&self, date: NaiveDate) -> Option<(NaiveTime, NaiveTime)> {
        if let Some(special) = self.special_date_on(date) {
            if let (Some(open), Some(close)) = (special.open_time, special.close_time) {
                return Some((open, close));
            }
        }
        self.weekday_hours(date)
            .filter(|h| !h.is_closed)
            .map(|h| (h.open_time, h.close_time))
    }
}

// ---------------------------------------------------------------------------
// AvailabilityService
// ---------------------------------------------------------------------------

/// A booking submission validated against fresh facts before commit
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub user_id: Uuid,
    pub booking_date: NaiveDate,
    pub time_slot_id: i32,
    pub total_price: Decimal,
}

/// Availability queries over a facts store
#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<dyn CalendarFactsStore>,
    window: BookingWindow,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn CalendarFactsStore>, window: BookingWindow) -> Self {
        Self { store, window }
    }

    /// Build a calculator over a freshly loaded snapshot for `[from, to]`
    pub async fn calculator_for(
        &self,
        today: NaiveDate,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<AvailabilityCalculator> {
        let facts = self.store.load_facts(from, to).await?;
        Ok(AvailabilityCalculator::new(facts, self.window, today))
    }

    /// Day availability for calendar rendering
    pub async fn day_availability(
        &self,
        today: NaiveDate,
        date: NaiveDate,
    ) -> AppResult<DayAvailability> {
        let calculator = self.calculator_for(today, date, date).await?;
        Ok(calculator.day_availability(date))
    }

    /// Month availability for calendar rendering
    pub async fn month_availability(
        &self,
        today: NaiveDate,
        year: i32,
        month: u32,
    ) -> AppResult<Vec<DayAvailability>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::Validation(format!("invalid month: {}-{}", year, month)))?;
        let last = last_day_of_month(first);
        let calculator = self.calculator_for(today, first, last).await?;
        calculator.month_availability(year, month)
    }

    /// Re-validate against fresh facts, then attempt the store's atomic
    /// conditional insert. The advisory check gives the user-facing reason;
    /// the insert conflict is the authoritative answer.
    ///
    /// Uses the UTC calendar day as `today`; embedders whose studio runs in
    /// another time zone should pass a studio-local day to
    /// [`confirm_booking_at`](Self::confirm_booking_at).
    pub async fn confirm_booking(&self, request: BookingRequest) -> AppResult<SlotVerdict> {
        let today = Utc::now().date_naive();
        self.confirm_booking_at(today, request).await
    }

    /// As [`confirm_booking`](Self::confirm_booking), with an explicit
    /// `today` (the studio-local calendar day).
    pub async fn confirm_booking_at(
        &self,
        today: NaiveDate,
        request: BookingRequest,
    ) -> AppResult<SlotVerdict> {
        let calculator = self
            .calculator_for(today, request.booking_date, request.booking_date)
            .await?;

        let slot = calculator
            .facts
            .time_slots
            .iter()
            .find(|s| s.id == request.time_slot_id && s.is_active)
            .ok_or_else(|| {
                AppError::NotFound(format!("time slot {} not found", request.time_slot_id))
            })?;

        let verdict = calculator.check_slot(request.booking_date, slot);
        if !verdict.available {
            return Ok(verdict);
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            booking_date: request.booking_date,
            time_slot_id: request.time_slot_id,
            status: BookingStatus::Pending,
            total_price: request.total_price,
        };

        match self.store.insert_booking(booking).await? {
            InsertOutcome::Created => Ok(SlotVerdict::available()),
            InsertOutcome::SlotTaken => {
                tracing::debug!(
                    date = %request.booking_date,
                    slot_id = request.time_slot_id,
                    "conditional insert lost the race"
                );
                Ok(SlotVerdict::rejected(RejectionReason::AlreadyBooked))
            }
        }
    }
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InternalBlock, OpeningHours, SpecialDate};
    use rust_decimal::Decimal;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn morning_slot() -> TimeSlot {
        TimeSlot {
            id: 1,
            name: "Morning".into(),
            start_time: time(9, 0),
            end_time: time(12, 0),
            duration_hours: 3,
            base_price: Decimal::from(20000),
            is_active: true,
        }
    }

    /// Mon-Sun 09:00-21:00
    fn full_week_hours() -> Vec<OpeningHours> {
        (0..7)
            .map(|d| OpeningHours::new(d, time(9, 0), time(21, 0)))
            .collect()
    }

    fn calculator(facts: CalendarFacts) -> AvailabilityCalculator {
        // today = Mon 2026-09-07, window 1..=90 days ahead
        AvailabilityCalculator::new(facts, BookingWindow::new(1, 90), date(2026, 9, 7))
    }

    fn base_facts() -> CalendarFacts {
        CalendarFacts {
            opening_hours: full_week_hours(),
            time_slots: vec![morning_slot()],
            ..Default::default()
        }
    }

    #[test]
    fn slot_is_available_when_every_check_passes() {
        let calc = calculator(base_facts());
        let verdict = calc.check_slot(date(2026, 9, 10), &morning_slot());
        assert!(verdict.available);
        assert!(verdict.reason.is_none());
    }

    #[test]
    fn today_is_rejected_when_min_days_ahead_is_one() {
        let calc = calculator(base_facts());
        let verdict = calc.check_slot(date(2026, 9, 7), &morning_slot());
        assert_eq!(verdict.reason, Some(RejectionReason::OutsideBookingWindow));
    }

    #[test]
    fn max_days_ahead_boundary_day_is_bookable() {
        let calc = calculator(base_facts());
        // today + 90
        let boundary = date(2026, 12, 6);
        assert!(calc.is_date_within_booking_window(boundary));
        assert!(calc.check_slot(boundary, &morning_slot()).available);
        // today + 91
        let past_boundary = date(2026, 12, 7);
        assert_eq!(
            calc.check_slot(past_boundary, &morning_slot()).reason,
            Some(RejectionReason::OutsideBookingWindow)
        );
    }

    #[test]
    fn live_booking_blocks_the_exact_pair_only() {
        let mut facts = base_facts();
        facts.bookings.push(Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            booking_date: date(2026, 9, 10),
            time_slot_id: 1,
            status: BookingStatus::Confirmed,
            total_price: Decimal::from(20000),
        });
        let calc = calculator(facts);

        let taken = calc.check_slot(date(2026, 9, 10), &morning_slot());
        assert_eq!(taken.reason, Some(RejectionReason::AlreadyBooked));

        let next_day = calc.check_slot(date(2026, 9, 11), &morning_slot());
        assert!(next_day.available);
    }

    #[test]
    fn cancelled_booking_does_not_block() {
        let mut facts = base_facts();
        facts.bookings.push(Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            booking_date: date(2026, 9, 10),
            time_slot_id: 1,
            status: BookingStatus::Cancelled,
            total_price: Decimal::from(20000),
        });
        let calc = calculator(facts);
        assert!(calc.check_slot(date(2026, 9, 10), &morning_slot()).available);
    }

    #[test]
    fn block_nested_inside_the_slot_rejects_it() {
        let mut facts = base_facts();
        facts.internal_blocks.push(InternalBlock::new(
            date(2026, 9, 10).and_time(time(10, 0)),
            date(2026, 9, 10).and_time(time(10, 30)),
        ));
        let calc = calculator(facts);

        let verdict = calc.check_slot(date(2026, 9, 10), &morning_slot());
        assert_eq!(verdict.reason, Some(RejectionReason::BlockedInternally));
    }

    #[test]
    fn missing_weekday_record_means_closed() {
        let mut facts = base_facts();
        // keep Monday only; 2026-09-10 is a Thursday
        facts.opening_hours.retain(|h| h.day_of_week == 0);
        let calc = calculator(facts);

        let verdict = calc.check_slot(date(2026, 9, 10), &morning_slot());
        assert_eq!(verdict.reason, Some(RejectionReason::ClosedOnWeekday));
    }

    #[test]
    fn holiday_rejects_with_its_name() {
        let mut facts = base_facts();
        facts
            .special_dates
            .push(SpecialDate::holiday(date(2026, 9, 10), "Autumn Equinox"));
        let calc = calculator(facts);

        let verdict = calc.check_slot(date(2026, 9, 10), &morning_slot());
        assert_eq!(
            verdict.reason,
            Some(RejectionReason::ClosedSpecialDate { name: Some("Autumn Equinox".into()) })
        );
    }

    #[test]
    fn custom_hours_override_the_weekday_defaults() {
        let mut facts = base_facts();
        // open late that day: morning slot no longer fits
        facts
            .special_dates
            .push(SpecialDate::custom_hours(date(2026, 9, 10), time(13, 0), time(18, 0)));
        let calc = calculator(facts);

        let verdict = calc.check_slot(date(2026, 9, 10), &morning_slot());
        assert_eq!(verdict.reason, Some(RejectionReason::OutsideOpeningHours));
    }

    #[test]
    fn slot_outside_weekday_hours_is_rejected() {
        let mut facts = base_facts();
        for hours in &mut facts.opening_hours {
            hours.open_time = time(10, 0);
        }
        let calc = calculator(facts);

        let verdict = calc.check_slot(date(2026, 9, 10), &morning_slot());
        assert_eq!(verdict.reason, Some(RejectionReason::OutsideOpeningHours));
    }

    #[test]
    fn window_rejection_wins_over_every_other_check() {
        let mut facts = base_facts();
        facts
            .special_dates
            .push(SpecialDate::holiday(date(2027, 3, 10), "Far-future holiday"));
        let calc = calculator(facts);

        // outside the 90-day window and a holiday: window reason first
        let verdict = calc.check_slot(date(2027, 3, 10), &morning_slot());
        assert_eq!(verdict.reason, Some(RejectionReason::OutsideBookingWindow));
    }

    #[test]
    fn booked_pair_reports_conflict_before_block_overlap() {
        let mut facts = base_facts();
        let day = date(2026, 9, 10);
        facts.bookings.push(Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            booking_date: day,
            time_slot_id: 1,
            status: BookingStatus::Paid,
            total_price: Decimal::from(20000),
        });
        facts
            .internal_blocks
            .push(InternalBlock::new(day.and_time(time(9, 0)), day.and_time(time(12, 0))));
        let calc = calculator(facts);

        let verdict = calc.check_slot(day, &morning_slot());
        assert_eq!(verdict.reason, Some(RejectionReason::AlreadyBooked));
    }

    #[test]
    fn holiday_day_is_closed_with_no_slots() {
        let mut facts = base_facts();
        facts
            .special_dates
            .push(SpecialDate::holiday(date(2026, 9, 10), "Autumn Equinox"));
        let calc = calculator(facts);

        let day = calc.day_availability(date(2026, 9, 10));
        assert!(!day.is_open);
        assert!(day.is_holiday);
        assert_eq!(day.holiday_name.as_deref(), Some("Autumn Equinox"));
        assert!(day.available_slots.is_empty());
    }

    #[test]
    fn closed_special_date_is_not_flagged_as_holiday() {
        let mut facts = base_facts();
        facts
            .special_dates
            .push(SpecialDate::closed(date(2026, 9, 10), Some("Renovation".into())));
        let calc = calculator(facts);

        let day = calc.day_availability(date(2026, 9, 10));
        assert!(!day.is_open);
        assert!(!day.is_holiday);
        assert!(day.available_slots.is_empty());
    }

    #[test]
    fn inactive_slots_are_never_offered() {
        let mut facts = base_facts();
        facts.time_slots[0].is_active = false;
        let calc = calculator(facts);

        let day = calc.day_availability(date(2026, 9, 10));
        assert!(!day.is_open);
        assert!(day.available_slots.is_empty());
    }

    #[test]
    fn month_availability_covers_every_day_in_order() {
        let calc = calculator(base_facts());
        let days = calc.month_availability(2026, 9).unwrap();

        assert_eq!(days.len(), 30);
        assert_eq!(days[0].date, date(2026, 9, 1));
        assert_eq!(days[29].date, date(2026, 9, 30));
        for pair in days.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn store_errors_propagate_through_the_service() {
        tokio_test::block_on(async {
            let mut store = crate::store::MockCalendarFactsStore::new();
            store
                .expect_load_facts()
                .returning(|_, _| Err(AppError::Store("facts store unreachable".into())));
            let service = AvailabilityService::new(Arc::new(store), BookingWindow::new(1, 90));

            let result = service.day_availability(date(2026, 9, 7), date(2026, 9, 10)).await;
            assert!(matches!(result, Err(AppError::Store(_))));
        });
    }

    #[test]
    fn invalid_month_is_a_validation_error() {
        let calc = calculator(base_facts());
        assert!(matches!(
            calc.month_availability(2026, 13),
            Err(AppError::Validation(_))
        ));
    }
}
