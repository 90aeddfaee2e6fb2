//! Display formatting for amounts, quantities, rates and dates.
//!
//! This is the only place where amounts are rounded, and the rounded value
//! is never stored back.

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format used when a configured date format cannot be parsed.
pub const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Round to `dp` decimal places, halves away from zero (2.345 → 2.35,
/// -2.345 → -2.35).
pub fn round_half_away(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Fixed-point rendering with exactly `dp` decimals.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = round_half_away(value, dp);
    rounded.rescale(dp);
    rounded.to_string()
}

/// A monetary amount: two decimals plus the currency suffix (`605.00 EUR`).
pub fn format_amount(value: Decimal, currency: &str) -> String {
    with_currency(format_fixed(value, 2), currency)
}

/// A unit price: three decimals plus the currency suffix (`50.000 EUR`).
pub fn format_unit_price(value: Decimal, currency: &str) -> String {
    with_currency(format_fixed(value, 3), currency)
}

/// A quantity with two decimals.
pub fn format_quantity(value: Decimal) -> String {
    format_fixed(value, 2)
}

/// A VAT fraction as a percentage without trailing zeros (`0.21` → `21%`,
/// `0.055` → `5.5%`).
pub fn format_rate(rate: Decimal) -> String {
    let percent = round_half_away(rate * Decimal::ONE_HUNDRED, 2).normalize();
    format!("{percent}%")
}

/// Format a date with a strftime pattern, falling back to
/// [`FALLBACK_DATE_FORMAT`] when the pattern is malformed.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return date.format(FALLBACK_DATE_FORMAT).to_string();
    }
    date.format_with_items(items.iter()).to_string()
}

fn with_currency(number: String, currency: &str) -> String {
    if currency.is_empty() {
        number
    } else {
        format!("{number} {currency}")
    }
}
