//! Price computation for bookings
//!
//! `total = base + extras - discount`, with the discount rounded
//! half-away-from-zero to whole currency units.

use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{Extra, SelectedExtra},
};

/// Round a monetary amount to whole currency units, half away from zero
pub(crate) fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Full price breakdown for a prospective or existing booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: Decimal,
    pub extras_price: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Compute the grand total for a booking.
///
/// `discount_percent` applies to `base_price + extras_price`. Negative
/// prices or quantities and out-of-range percentages are caller errors.
pub fn compute_total(
    base_price: Decimal,
    extras: &[SelectedExtra],
    discount_percent: Decimal,
) -> AppResult<PriceBreakdown> {
    if base_price.is_sign_negative() {
        return Err(AppError::Validation(format!(
            "base price must not be negative: {}",
            base_price
        )));
    }
    if discount_percent.is_sign_negative() || discount_percent > Decimal::ONE_HUNDRED {
        return Err(AppError::Validation(format!(
            "discount percent must be between 0 and 100: {}",
            discount_percent
        )));
    }

    let mut extras_price = Decimal::ZERO;
    for selected in extras {
        if selected.extra.price.is_sign_negative() {
            return Err(AppError::Validation(format!(
                "extra '{}' has a negative price",
                selected.extra.name
            )));
        }
        extras_price += selected.line_total();
    }

    let subtotal = base_price + extras_price;
    let discount = round_currency(subtotal * discount_percent / Decimal::ONE_HUNDRED);
    let total = subtotal - discount;

    Ok(PriceBreakdown { base_price, extras_price, discount, total })
}

/// What [`ExtrasSelection::set_quantity`] did to the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Updated,
    /// The line was dropped (quantity below one); removal is signalled,
    /// never silently clamped to zero.
    Removed,
    NotSelected,
}

/// An ordered basket of selected extras, keyed by extra id.
///
/// Insertion order is preserved so invoice lines render in the order the
/// user picked them.
#[derive(Debug, Clone, Default)]
pub struct ExtrasSelection {
    lines: IndexMap<i32, SelectedExtra>,
}

impl ExtrasSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extra with its default quantity: the slot duration for
    /// per-hour extras, one otherwise. Re-selecting an already-present
    /// extra leaves its quantity untouched.
    pub fn select(&mut self, extra: Extra, slot_duration_hours: u32) {
        let quantity = extra.price_kind.default_quantity(slot_duration_hours);
        self.lines
            .entry(extra.id)
            .or_insert(SelectedExtra { extra, quantity });
    }

    /// Change a line's quantity. A quantity below one removes the line.
    pub fn set_quantity(&mut self, extra_id: i32, quantity: i64) -> SelectionChange {
        if !self.lines.contains_key(&extra_id) {
            return SelectionChange::NotSelected;
        }
        if quantity < 1 {
            self.lines.shift_remove(&extra_id);
            return SelectionChange::Removed;
        }
        if let Some(line) = self.lines.get_mut(&extra_id) {
            line.quantity = quantity as u32;
        }
        SelectionChange::Updated
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The selected lines, in insertion order
    pub fn lines(&self) -> Vec<SelectedExtra> {
        self.lines.values().cloned().collect()
    }
}
