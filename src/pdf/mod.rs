//! PDF output.
//!
//! [`PdfCanvas`] implements the layout [`Canvas`](crate::layout::Canvas)
//! with the standard Type1 fonts, so documents need no embedded font
//! files. [`generate_pdf`] renders an invoice completely in memory and only
//! then writes it, which means a failed render never leaves a file behind.
//!
//! ```no_run
//! # fn demo(invoice: &pdf_invoicer::Invoice) -> Result<(), pdf_invoicer::InvoiceError> {
//! use pdf_invoicer::layout::DocumentStyle;
//!
//! let report = pdf_invoicer::pdf::generate_pdf(invoice, &DocumentStyle::default(), "invoice.pdf")?;
//! println!("{} page(s)", report.pages);
//! # Ok(())
//! # }
//! ```

mod canvas;
mod metrics;

use std::path::Path;

pub use canvas::{CELL_MARGIN, DrawOp, Page, PdfCanvas};

use crate::core::{Invoice, InvoiceError, write_atomic};
use crate::layout::{Canvas, DocumentStyle, RenderReport, render_invoice};

/// Render `invoice` into PDF bytes.
///
/// The same invoice and style always produce the same bytes.
pub fn render_pdf(
    invoice: &Invoice,
    style: &DocumentStyle,
) -> Result<(Vec<u8>, RenderReport), InvoiceError> {
    let mut canvas = PdfCanvas::new(style.page);
    let report = render_invoice(invoice, style, &mut canvas)?;
    let bytes = canvas
        .finish()
        .map_err(|e| InvoiceError::Encoding(e.to_string()))?;
    Ok((bytes, report))
}

/// Render `invoice` and write it to `path`.
///
/// An existing file at `path` is replaced only when rendering succeeded.
#[tracing::instrument(
    skip_all,
    fields(invoice = %invoice.number(), path = %path.as_ref().display())
)]
pub fn generate_pdf(
    invoice: &Invoice,
    style: &DocumentStyle,
    path: impl AsRef<Path>,
) -> Result<RenderReport, InvoiceError> {
    let (bytes, report) = render_pdf(invoice, style).inspect_err(|e| {
        tracing::warn!(error = %e, "invoice not rendered, nothing written");
    })?;
    write_atomic(path.as_ref(), &bytes)?;
    Ok(report)
}
