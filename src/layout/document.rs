//! Sequences the blocks of an invoice onto a [`Canvas`].

use crate::core::money::{
    format_amount, format_date, format_quantity, format_rate, format_unit_price,
};
use crate::core::{Invoice, InvoiceError, LineItem, format_address};

use super::canvas::{Advance, Align, Canvas, CanvasError, CellStyle, Font, FontStyle};
use super::style::DocumentStyle;
use super::table::{Column, RowPlacement, SummaryBand, TableLayout};

const TITLE_HEIGHT: f64 = 10.0;
const BLOCK_GAP: f64 = 10.0;
const NOTES_GAP: f64 = 20.0;
const LINE_GAP: f64 = 5.0;

/// Outcome of laying out one invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    /// Number of pages used.
    pub pages: usize,
    /// Placement of every item row, in item order.
    pub rows: Vec<RowPlacement>,
}

/// The item table: Description (wrapping), Qty, Unit Price, VAT Rate,
/// VAT Amount, Total.
pub fn item_table(style: &DocumentStyle) -> TableLayout {
    let labels = &style.labels;
    let widths = &style.columns;
    TableLayout::new(
        vec![
            Column::new(&labels.description, widths.description, Align::Left),
            Column::new(&labels.quantity, widths.quantity, Align::Center),
            Column::new(&labels.unit_price, widths.unit_price, Align::Right),
            Column::new(&labels.vat_rate, widths.vat_rate, Align::Center),
            Column::new(&labels.vat_amount, widths.vat_amount, Align::Right),
            Column::new(&labels.total, widths.total, Align::Right),
        ],
        0,
        style.line_height,
    )
    .repeat_header(style.repeat_table_header)
}

/// Display texts of one item row, in column order.
pub fn item_cells(item: &LineItem, currency: &str) -> [String; 6] {
    let amounts = item.amounts();
    [
        item.description().to_string(),
        format_quantity(item.quantity()),
        format_unit_price(item.unit_price(), currency),
        format_rate(item.vat_rate()),
        format_amount(amounts.vat, currency),
        format_amount(amounts.total, currency),
    ]
}

/// Lay out `invoice` on `canvas`: title, issuer and client, summary, item
/// table, total, then payment details, notes and reference when present.
///
/// The invoice is only read. On error the canvas holds a partial document
/// that the caller must discard.
#[tracing::instrument(level = "debug", skip_all, fields(invoice = %invoice.number()))]
pub fn render_invoice<C: Canvas + ?Sized>(
    invoice: &Invoice,
    style: &DocumentStyle,
    canvas: &mut C,
) -> Result<RenderReport, InvoiceError> {
    style
        .check()
        .map_err(|e| InvoiceError::layout("document style", e))?;

    let mut doc = Assembler {
        invoice,
        style,
        canvas,
    };

    doc.block("title", |d| d.title())?;
    doc.block("party block", |d| d.parties())?;
    doc.block("summary block", |d| d.summary())?;
    let rows = doc.items()?;
    doc.block("total line", |d| d.total_line())?;
    doc.block("payment block", |d| d.payment())?;
    doc.block("notes", |d| d.notes())?;
    doc.block("reference", |d| d.reference())?;

    let pages = doc.canvas.page();
    tracing::info!(
        invoice = %invoice.number(),
        pages,
        items = rows.len(),
        "invoice laid out"
    );
    Ok(RenderReport { pages, rows })
}

struct Assembler<'a, C: Canvas + ?Sized> {
    invoice: &'a Invoice,
    style: &'a DocumentStyle,
    canvas: &'a mut C,
}

impl<C: Canvas + ?Sized> Assembler<'_, C> {
    fn block(
        &mut self,
        name: &str,
        draw: impl FnOnce(&mut Self) -> Result<(), CanvasError>,
    ) -> Result<(), InvoiceError> {
        draw(self).map_err(|e| InvoiceError::layout(name, e))
    }

    fn set_font(&mut self, style: FontStyle, size: f64) {
        self.canvas
            .set_font(Font::new(self.style.font_family, style, size));
    }

    fn width(&self) -> f64 {
        self.canvas.setup().content_width()
    }

    fn full_line(&mut self, text: &str, align: Align) -> Result<(), CanvasError> {
        let width = self.width();
        self.canvas.cell(
            width,
            self.style.line_height,
            text,
            &CellStyle::new(align),
            Advance::NextLine,
        )
    }

    fn ensure_space(&mut self, height: f64, block: &str) -> Result<(), CanvasError> {
        let had_page = self.canvas.page() > 0;
        if self.canvas.ensure_space(height)? && had_page {
            tracing::debug!(block, page = self.canvas.page(), "block moved to a new page");
        }
        Ok(())
    }

    fn title(&mut self) -> Result<(), CanvasError> {
        self.ensure_space(TITLE_HEIGHT, "title")?;
        self.set_font(FontStyle::Bold, self.style.title_size);
        let width = self.width();
        let text = format!("{} - {}", self.style.labels.title, self.invoice.number());
        self.canvas.cell(
            width,
            TITLE_HEIGHT,
            &text,
            &CellStyle::new(Align::Center),
            Advance::NextLine,
        )?;
        self.canvas.ln(BLOCK_GAP);
        Ok(())
    }

    /// Issuer on the left, client on the right: labels, names, address
    /// lines, tax ids.
    fn parties(&mut self) -> Result<(), CanvasError> {
        let (invoice, style) = (self.invoice, self.style);
        let issuer = &invoice.issuer().party;
        let client = invoice.client();
        let labels = &style.labels;
        let line_height = style.line_height;
        let text_line_height = style.text_line_height;

        let issuer_lines = format_address(&issuer.address);
        let client_lines = format_address(&client.address);
        let address_rows = issuer_lines.len().max(client_lines.len());
        self.ensure_space(
            3.0 * line_height + address_rows as f64 * text_line_height,
            "party block",
        )?;

        let half = self.width() / 2.0;
        self.set_font(FontStyle::Regular, style.body_size);
        self.pair(half, line_height, &labels.from, &labels.to)?;
        self.set_font(FontStyle::Regular, style.heading_size);
        self.pair(half, line_height, &issuer.name, &client.name)?;

        self.set_font(FontStyle::Regular, style.body_size);
        let left = self.canvas.setup().margins.left;
        let top = self.canvas.y();
        let columns = [
            (left, Align::Left, &issuer_lines),
            (left + half, Align::Right, &client_lines),
        ];
        for (x, align, lines) in columns {
            for (row, line) in lines.iter().enumerate() {
                self.canvas.set_xy(x, top + row as f64 * text_line_height);
                self.canvas.cell(
                    half,
                    text_line_height,
                    line,
                    &CellStyle::new(align),
                    Advance::Right,
                )?;
            }
        }
        self.canvas
            .set_y(top + address_rows as f64 * text_line_height);

        let issuer_tax = format!("{}: {}", labels.tax_id, issuer.tax_id);
        let client_tax = format!("{}: {}", labels.tax_id, client.tax_id);
        self.pair(half, line_height, &issuer_tax, &client_tax)?;
        self.canvas.ln(BLOCK_GAP);
        Ok(())
    }

    fn pair(&mut self, half: f64, height: f64, left: &str, right: &str) -> Result<(), CanvasError> {
        self.canvas
            .cell(half, height, left, &CellStyle::new(Align::Left), Advance::Right)?;
        self.canvas.cell(
            half,
            height,
            right,
            &CellStyle::new(Align::Right),
            Advance::NextLine,
        )
    }

    fn summary_rows(&self) -> Vec<String> {
        let invoice = self.invoice;
        let labels = &self.style.labels;
        let date = |d| format_date(d, &self.style.date_format);

        let mut rows = vec![
            format!("{}: {}", labels.number, invoice.number()),
            format!("{}: {}", labels.emission_date, date(invoice.emission_date())),
        ];
        if invoice.operation_date() != invoice.emission_date() {
            rows.push(format!(
                "{}: {}",
                labels.operation_date,
                date(invoice.operation_date())
            ));
        }
        rows.push(format!("{}: {}", labels.due_date, date(invoice.due_date())));
        if invoice.is_paid() {
            rows.push(format!("{}: {}", labels.status, labels.paid));
        }
        rows.push(format!(
            "{}: {}",
            labels.total_amount,
            format_amount(invoice.totals().gross_total, &self.style.currency)
        ));
        rows
    }

    fn summary(&mut self) -> Result<(), CanvasError> {
        let style = self.style;
        let rows = self.summary_rows();
        let band = SummaryBand::new(style.summary_width, style.line_height, style.shade);
        self.ensure_space(
            style.line_height + 2.0 + band.height(rows.len()),
            "summary block",
        )?;

        self.set_font(FontStyle::Bold, style.heading_size);
        self.full_line(&style.labels.summary, Align::Center)?;
        self.canvas.ln(2.0);

        self.set_font(FontStyle::Regular, style.body_size);
        band.draw(&mut *self.canvas, &rows)?;
        self.canvas.ln(BLOCK_GAP);
        Ok(())
    }

    fn items(&mut self) -> Result<Vec<RowPlacement>, InvoiceError> {
        let (invoice, style) = (self.invoice, self.style);
        let table = item_table(style);
        let currency = &style.currency;
        self.set_font(FontStyle::Regular, style.body_size);

        // keep the header on the page of the first row
        let first_height = match invoice.items().first() {
            Some(item) => {
                let cells = item_cells(item, currency);
                table
                    .measure_row(&*self.canvas, &cells.each_ref().map(String::as_str))
                    .map_err(|e| InvoiceError::layout("item row 1", e))?
            }
            None => 0.0,
        };
        self.ensure_space(style.line_height + first_height, "item table")
            .map_err(|e| InvoiceError::layout("item table", e))?;
        table
            .draw_header(&mut *self.canvas)
            .map_err(|e| InvoiceError::layout("item table header", e))?;

        let mut rows = Vec::with_capacity(invoice.items().len());
        for (index, item) in invoice.items().iter().enumerate() {
            let cells = item_cells(item, currency);
            let placement = table
                .draw_row(&mut *self.canvas, &cells.each_ref().map(String::as_str))
                .map_err(|e| InvoiceError::layout(format!("item row {}", index + 1), e))?;
            rows.push(placement);
        }
        Ok(rows)
    }

    fn total_line(&mut self) -> Result<(), CanvasError> {
        self.canvas.ln(BLOCK_GAP);
        self.ensure_space(self.style.line_height, "total line")?;
        self.set_font(FontStyle::Bold, self.style.heading_size);
        let text = format!(
            "{}: {}",
            self.style.labels.total_amount,
            format_amount(self.invoice.totals().gross_total, &self.style.currency)
        );
        self.full_line(&text, Align::Right)
    }

    fn payment(&mut self) -> Result<(), CanvasError> {
        let labels = &self.style.labels;
        let mut lines = Vec::new();
        if let Some(method) = self.invoice.payment_method() {
            lines.push(format!("{}: {method}", labels.payment_method));
        }
        let iban = self.invoice.issuer().iban.as_deref();
        if let Some(iban) = iban.filter(|i| !i.trim().is_empty()) {
            lines.push(format!("{}: {iban}", labels.iban));
        }
        if lines.is_empty() {
            return Ok(());
        }

        self.canvas.ln(LINE_GAP);
        self.ensure_space(lines.len() as f64 * self.style.line_height, "payment block")?;
        self.set_font(FontStyle::Regular, self.style.body_size);
        for line in &lines {
            self.full_line(line, Align::Left)?;
        }
        Ok(())
    }

    fn notes(&mut self) -> Result<(), CanvasError> {
        let (invoice, style) = (self.invoice, self.style);
        let Some(notes) = invoice.notes() else {
            return Ok(());
        };
        self.canvas.ln(NOTES_GAP);
        self.ensure_space(style.text_line_height, "notes")?;
        self.set_font(FontStyle::Regular, style.body_size);
        let width = self.width();
        self.canvas.multi_cell(
            width,
            style.text_line_height,
            notes,
            &CellStyle::new(Align::Left),
        )
    }

    fn reference(&mut self) -> Result<(), CanvasError> {
        let invoice = self.invoice;
        let Some(reference) = invoice.reference() else {
            return Ok(());
        };
        self.canvas.ln(LINE_GAP);
        self.ensure_space(self.style.line_height, "reference")?;
        self.set_font(FontStyle::Regular, self.style.body_size);
        let text = format!("{}: {reference}", self.style.labels.reference);
        self.full_line(&text, Align::Left)
    }
}
