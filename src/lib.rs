//! Studio Booking Engine
//!
//! Availability resolution, pricing, coupon validation and cancellation
//! fees for a studio-rental booking system, exposed as a library to be
//! embedded by web handlers and background jobs. The engine is pure over
//! immutable calendar snapshots; persistence sits behind the traits in
//! [`store`].

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::availability::{
    AvailabilityCalculator, AvailabilityService, BookingRequest, DayAvailability,
    RejectionReason, SlotVerdict,
};
pub use services::cancellation::{compute_fee, compute_fee_now, FeeBreakdown};
pub use services::coupons::CouponsService;
pub use services::pricing::{compute_total, ExtrasSelection, PriceBreakdown, SelectionChange};
pub use services::Services;
