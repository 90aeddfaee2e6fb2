//! # pdf-invoicer
//!
//! Turns an invoice record (issuer, client, line items, dates) into a
//! paginated PDF document: it computes every line and invoice amount, lays
//! the items out in a table whose rows grow with their wrapped description,
//! and never splits a row across pages.
//!
//! All monetary values use [`rust_decimal::Decimal`]; amounts are rounded
//! once, when they are formatted for display.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pdf_invoicer::core::*;
//! use rust_decimal_macros::dec;
//!
//! let address = AddressBuilder::new("Main", "12", "08001", "Barcelona", "Spain")
//!     .build()
//!     .unwrap();
//! let issuer = IssuerBuilder::new("Acme SL", address.clone(), "B12345678")
//!     .iban("ES91 2100 0418 4502 0005 1332")
//!     .build()
//!     .unwrap();
//! let client = PartyBuilder::new("Client SA", address, "A87654321").build().unwrap();
//!
//! let invoice = InvoiceBuilder::new("F-2024-001", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
//!     .issuer(issuer)
//!     .client(client)
//!     .add_item(LineItem::new("Consulting", dec!(10), dec!(50), dec!(0.21)).unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(invoice.totals().net_total, dec!(500));
//! assert_eq!(invoice.totals().vat_total, dec!(105));
//! assert_eq!(invoice.totals().gross_total, dec!(605));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Invoice types, validation, totals, table layout against [`layout::Canvas`] |
//! | `pdf` (default) | [`pdf::PdfCanvas`] and [`pdf::generate_pdf`] |
//! | `json` | JSON export and import of the invoice record |
//! | `cli` | The `pdf-invoicer` binary |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod layout;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "json")]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
