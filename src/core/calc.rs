//! Line-item and invoice-total arithmetic.
//!
//! Nothing here rounds. Amounts keep full decimal precision and are only
//! rounded when they are printed (see [`super::money`]).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::{Constraint, ValidationError};
use super::types::{LineItem, Totals};

/// Largest accepted item quantity.
pub const MAX_QUANTITY: Decimal = dec!(1000000000);
/// Largest accepted unit price.
pub const MAX_UNIT_PRICE: Decimal = dec!(1000000000000);
/// Largest accepted VAT rate (as a fraction; 10 = 1000 %).
pub const MAX_VAT_RATE: Decimal = dec!(10);

/// Derived amounts of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    /// quantity × unit price.
    pub net: Decimal,
    /// net × VAT rate.
    pub vat: Decimal,
    /// net + vat.
    pub total: Decimal,
}

/// Compute `(vat_amount, line_total)` for one line.
///
/// Negative inputs are rejected, never clamped. Field names in the error are
/// relative to the item (`quantity`, `unit_price`, `vat_rate`).
pub fn compute_line(
    quantity: Decimal,
    unit_price: Decimal,
    vat_rate: Decimal,
) -> Result<LineAmounts, ValidationError> {
    check_input("quantity", quantity, MAX_QUANTITY)?;
    check_input("unit_price", unit_price, MAX_UNIT_PRICE)?;
    check_input("vat_rate", vat_rate, MAX_VAT_RATE)?;
    Ok(line_amounts(quantity, unit_price, vat_rate))
}

/// Arithmetic of [`compute_line`] without the range checks. Callers hold
/// values that already passed them.
pub(crate) fn line_amounts(
    quantity: Decimal,
    unit_price: Decimal,
    vat_rate: Decimal,
) -> LineAmounts {
    let net = quantity * unit_price;
    let vat = net * vat_rate;
    LineAmounts {
        net,
        vat,
        total: net + vat,
    }
}

/// Sum the items into invoice totals.
///
/// Items are summed in sequence order; decimal addition is exact at the
/// supported magnitudes, so the result does not depend on that order.
pub fn aggregate(items: &[LineItem]) -> Totals {
    let (net_total, vat_total) = items
        .iter()
        .map(LineItem::amounts)
        .fold((Decimal::ZERO, Decimal::ZERO), |(net, vat), line| {
            (net + line.net, vat + line.vat)
        });

    Totals {
        net_total,
        vat_total,
        gross_total: net_total + vat_total,
    }
}

fn check_input(field: &str, value: Decimal, max: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new(
            field,
            Constraint::NonNegative,
            format!("must not be negative (got {value})"),
        ));
    }
    if value > max {
        return Err(ValidationError::new(
            field,
            Constraint::OutOfRange,
            format!("must not exceed {max} (got {value})"),
        ));
    }
    Ok(())
}
