//! Bookable extras (equipment, staff, services) and their pricing kinds

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an extra's unit price is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceKind {
    /// One flat charge per booking
    Fixed,
    /// Charged per hour of the booked slot
    PerHour,
    /// Charged per attending person
    PerPerson,
}

impl PriceKind {
    /// Default quantity when the extra is first selected.
    ///
    /// Per-hour extras start at the slot's duration; fixed and per-person
    /// extras start at one.
    pub fn default_quantity(&self, slot_duration_hours: u32) -> u32 {
        match self {
            PriceKind::PerHour => slot_duration_hours.max(1),
            PriceKind::Fixed | PriceKind::PerPerson => 1,
        }
    }
}

/// An optional add-on offered with a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extra {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub price_kind: PriceKind,
    pub description: Option<String>,
}

/// An extra chosen for a booking, with its quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedExtra {
    pub extra: Extra,
    pub quantity: u32,
}

impl SelectedExtra {
    /// Line total for this selection
    pub fn line_total(&self) -> Decimal {
        self.extra.price * Decimal::from(self.quantity)
    }
}
