//! Page layout: the [`Canvas`] drawing primitive, the item table with its
//! page-break rules, and the document assembler that places every block of
//! an invoice.
//!
//! Nothing here depends on a concrete output format. The PDF backend lives
//! in the `pdf` module; tests drive the layout through an in-memory canvas.

mod canvas;
mod document;
mod style;
mod table;

pub use canvas::*;
pub use document::{RenderReport, item_cells, item_table, render_invoice};
pub use style::*;
pub use table::*;
