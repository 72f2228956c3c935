//! Booking engine services

pub mod availability;
pub mod cancellation;
pub mod coupons;
pub mod pricing;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    models::CancellationPolicy,
    store::{CalendarFactsStore, CouponStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub coupons: coupons::CouponsService,
    pub cancellation_policy: CancellationPolicy,
}

impl Services {
    /// Create all services over the given stores and configuration
    pub fn new(
        facts_store: Arc<dyn CalendarFactsStore>,
        coupon_store: Arc<dyn CouponStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            availability: availability::AvailabilityService::new(
                facts_store,
                config.booking_window(),
            ),
            coupons: coupons::CouponsService::new(coupon_store),
            cancellation_policy: CancellationPolicy::new(config.cancellation_rules()),
        }
    }
}
