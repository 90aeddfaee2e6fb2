//! JSON archival format of the invoice record.
//!
//! The document carries `schema_version`, the input fields and, for
//! readers that do not recompute them, every derived amount. On import the
//! derived amounts are ignored: they are recomputed from the items and the
//! record goes through the validation gate again.

use std::path::Path;

use crate::core::{Invoice, InvoiceError, InvoiceRecord, write_atomic};

/// Pretty-printed JSON of `invoice`.
pub fn to_json(invoice: &Invoice) -> Result<String, InvoiceError> {
    Ok(serde_json::to_string_pretty(invoice)?)
}

/// Parse and validate an invoice record.
///
/// Malformed JSON is an [`InvoiceError::Json`]; a well-formed record that
/// breaks a rule is an [`InvoiceError::Validation`].
pub fn from_json(json: &str) -> Result<Invoice, InvoiceError> {
    let record: InvoiceRecord = serde_json::from_str(json)?;
    Ok(Invoice::try_from(record)?)
}

/// Write `invoice` as JSON to `path`, replacing it atomically.
pub fn write_json(invoice: &Invoice, path: impl AsRef<Path>) -> Result<(), InvoiceError> {
    let json = to_json(invoice)?;
    write_atomic(path.as_ref(), json.as_bytes())
}
