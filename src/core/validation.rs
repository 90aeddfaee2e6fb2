//! The validation gate.
//!
//! Every check is fail-fast and returns the first violated constraint. For a
//! whole invoice the order is fixed: schema and identifier, then the issuer
//! (address fields before name and tax id), the client (same order), every
//! item in sequence, the date ordering, and finally the item count.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calc;
use super::error::{Constraint, ValidationError};
use super::types::*;

/// Maximum number of items on one invoice.
pub const MAX_ITEMS: usize = 10_000;
/// Maximum length of the invoice identifier, in characters.
pub const MAX_NUMBER_LEN: usize = 200;

/// Check the mandatory fields of an address.
pub fn validate_address(address: &Address) -> Result<(), ValidationError> {
    required("street", &address.street)?;
    required("street_number", &address.street_number)?;
    required("zip_code", &address.zip_code)?;
    required("city", &address.city)?;
    required("country", &address.country)?;
    Ok(())
}

/// Check a party: its address first, then name and tax identifier.
pub fn validate_party(party: &Party) -> Result<(), ValidationError> {
    validate_address(&party.address).map_err(|e| e.within("address"))?;
    required("name", &party.name)?;
    required("tax_id", &party.tax_id)?;
    Ok(())
}

/// Check the issuer. Contact and bank details are optional.
pub fn validate_issuer(issuer: &Issuer) -> Result<(), ValidationError> {
    validate_party(&issuer.party)
}

/// Check the inputs of a line item: description, then quantity, unit price
/// and VAT rate.
pub fn validate_item_fields(
    description: &str,
    quantity: Decimal,
    unit_price: Decimal,
    vat_rate: Decimal,
) -> Result<(), ValidationError> {
    required("description", description)?;
    calc::compute_line(quantity, unit_price, vat_rate)?;
    Ok(())
}

/// Check a serialized line item.
pub fn validate_item(item: &LineItemRecord) -> Result<(), ValidationError> {
    validate_item_fields(&item.description, item.quantity, item.unit_price, item.vat_rate)
}

/// Check `emission <= operation <= due`.
///
/// A due date before the operation date is reported before an operation
/// date before the emission date.
pub fn validate_dates(
    emission: NaiveDate,
    operation: NaiveDate,
    due: NaiveDate,
) -> Result<(), ValidationError> {
    if due < operation {
        return Err(ValidationError::new(
            "due_date",
            Constraint::DateOrder,
            format!("due date {due} is before operation date {operation}"),
        ));
    }
    if operation < emission {
        return Err(ValidationError::new(
            "operation_date",
            Constraint::DateOrder,
            format!("operation date {operation} is before emission date {emission}"),
        ));
    }
    Ok(())
}

/// Run the whole gate over an invoice record.
pub fn validate_record(record: &InvoiceRecord) -> Result<(), ValidationError> {
    if record.schema_version != SCHEMA_VERSION {
        return Err(ValidationError::new(
            "schema_version",
            Constraint::SchemaVersion,
            format!(
                "unsupported schema version {} (expected {SCHEMA_VERSION})",
                record.schema_version
            ),
        ));
    }

    required("number", &record.number)?;
    if record.number.chars().count() > MAX_NUMBER_LEN {
        return Err(ValidationError::new(
            "number",
            Constraint::OutOfRange,
            format!("invoice number cannot exceed {MAX_NUMBER_LEN} characters"),
        ));
    }

    validate_issuer(&record.issuer).map_err(|e| e.within("issuer"))?;
    validate_party(&record.client).map_err(|e| e.within("client"))?;

    for (i, item) in record.items.iter().enumerate() {
        validate_item(item).map_err(|e| e.within(&format!("items[{i}]")))?;
    }

    validate_dates(record.emission_date, record.operation_date, record.due_date)?;

    if record.items.is_empty() {
        return Err(ValidationError::new(
            "items",
            Constraint::NonEmpty,
            "invoice must have at least one item",
        ));
    }
    check_item_capacity(record.items.len())
}

pub(crate) fn check_item_capacity(count: usize) -> Result<(), ValidationError> {
    if count > MAX_ITEMS {
        return Err(ValidationError::new(
            "items",
            Constraint::OutOfRange,
            format!("invoice cannot have more than {MAX_ITEMS} items"),
        ));
    }
    Ok(())
}

fn required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(
            field,
            Constraint::Required,
            format!("{} is mandatory", field.replace('_', " ")),
        ));
    }
    Ok(())
}
