//! Domain models for the booking engine

pub mod booking;
pub mod coupon;
pub mod extra;
pub mod policy;
pub mod schedule;
pub mod slot;

pub use booking::{Booking, BookingStatus};
pub use coupon::{Coupon, CouponRejection, CouponValidation};
pub use extra::{Extra, PriceKind, SelectedExtra};
pub use policy::{BookingWindow, CancellationPolicy, CancellationRule};
pub use schedule::{InternalBlock, OpeningHours, SpecialDate, SpecialDateKind};
pub use slot::TimeSlot;
