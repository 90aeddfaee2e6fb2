//! Invoice data model, validation gate and totals engine.
//!
//! Amounts are [`rust_decimal::Decimal`] and stay unrounded until they are
//! formatted for display by [`money`].

mod address;
mod builder;
pub mod calc;
mod error;
pub mod money;
mod output;
mod types;
mod validation;

pub use address::format_address;
pub use builder::*;
pub use calc::{LineAmounts, aggregate, compute_line};
pub use error::*;
pub use output::write_atomic;
pub use types::*;
pub use validation::*;
