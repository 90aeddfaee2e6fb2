use serde::{Deserialize, Serialize};

use super::canvas::{CanvasError, FontFamily, PageSetup, Rgb};

/// Visual configuration of a rendered invoice.
///
/// Every field has a default, so a style file only needs the values it
/// changes:
///
/// ```json
/// { "currency": "USD", "date_format": "%m/%d/%Y", "page": { "size": { "width": 215.9, "height": 279.4 } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyle {
    pub page: PageSetup,
    pub font_family: FontFamily,
    /// Title font size in points.
    pub title_size: f64,
    /// Section heading and party name size in points.
    pub heading_size: f64,
    /// Body text size in points.
    pub body_size: f64,
    /// Height of one table or summary row, in millimetres.
    pub line_height: f64,
    /// Line height of address and notes text, in millimetres.
    pub text_line_height: f64,
    pub columns: ColumnWidths,
    /// Width of the summary band.
    pub summary_width: f64,
    /// Fill of the shaded summary rows.
    pub shade: Rgb,
    /// Suffix printed after amounts; empty prints none.
    pub currency: String,
    /// strftime pattern for dates.
    pub date_format: String,
    /// Repeat the item table header at the top of continuation pages.
    pub repeat_table_header: bool,
    pub labels: Labels,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            page: PageSetup::default(),
            font_family: FontFamily::Helvetica,
            title_size: 16.0,
            heading_size: 12.0,
            body_size: 10.0,
            line_height: 7.0,
            text_line_height: 5.0,
            columns: ColumnWidths::default(),
            summary_width: 65.0,
            shade: Rgb(200, 200, 200),
            currency: "EUR".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            repeat_table_header: true,
            labels: Labels::default(),
        }
    }
}

impl DocumentStyle {
    /// Reject sizes the layout cannot work with.
    pub fn check(&self) -> Result<(), CanvasError> {
        let positive = [
            ("title_size", self.title_size),
            ("heading_size", self.heading_size),
            ("body_size", self.body_size),
            ("line_height", self.line_height),
            ("text_line_height", self.text_line_height),
            ("summary_width", self.summary_width),
            ("columns.description", self.columns.description),
            ("columns.quantity", self.columns.quantity),
            ("columns.unit_price", self.columns.unit_price),
            ("columns.vat_rate", self.columns.vat_rate),
            ("columns.vat_amount", self.columns.vat_amount),
            ("columns.total", self.columns.total),
        ];
        if let Some((name, value)) = positive
            .iter()
            .find(|(_, value)| !value.is_finite() || *value <= 0.0)
        {
            return Err(CanvasError::Geometry(format!(
                "{name} must be positive, got {value}"
            )));
        }

        let page = &self.page;
        let content_width = page.content_width();
        if page.content_height() < 3.0 * self.line_height {
            return Err(CanvasError::Geometry(format!(
                "printable page height {:.1} mm leaves no room for a table",
                page.content_height()
            )));
        }
        if self.columns.total_width() > content_width + 1e-6 {
            return Err(CanvasError::Geometry(format!(
                "table width {:.1} mm exceeds printable width {content_width:.1} mm",
                self.columns.total_width()
            )));
        }
        if self.summary_width > content_width + 1e-6 {
            return Err(CanvasError::Geometry(format!(
                "summary width {:.1} mm exceeds printable width {content_width:.1} mm",
                self.summary_width
            )));
        }
        Ok(())
    }
}

/// Item table column widths in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnWidths {
    pub description: f64,
    pub quantity: f64,
    pub unit_price: f64,
    pub vat_rate: f64,
    pub vat_amount: f64,
    pub total: f64,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            description: 60.0,
            quantity: 20.0,
            unit_price: 30.0,
            vat_rate: 20.0,
            vat_amount: 30.0,
            total: 30.0,
        }
    }
}

impl ColumnWidths {
    pub fn total_width(&self) -> f64 {
        self.description
            + self.quantity
            + self.unit_price
            + self.vat_rate
            + self.vat_amount
            + self.total
    }
}

/// Fixed texts printed on the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub title: String,
    pub from: String,
    pub to: String,
    pub tax_id: String,
    pub summary: String,
    pub number: String,
    pub emission_date: String,
    pub operation_date: String,
    pub due_date: String,
    pub status: String,
    pub paid: String,
    pub total_amount: String,
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub vat_rate: String,
    pub vat_amount: String,
    pub total: String,
    pub payment_method: String,
    pub iban: String,
    pub reference: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: "INVOICE".into(),
            from: "From:".into(),
            to: "To:".into(),
            tax_id: "NIF".into(),
            summary: "Invoice Summary".into(),
            number: "Invoice Number".into(),
            emission_date: "Emission Date".into(),
            operation_date: "Operation Date".into(),
            due_date: "Due Date".into(),
            status: "Status".into(),
            paid: "Paid".into(),
            total_amount: "Total Amount".into(),
            description: "Description".into(),
            quantity: "Qty".into(),
            unit_price: "Unit Price".into(),
            vat_rate: "VAT Rate".into(),
            vat_amount: "VAT Amount".into(),
            total: "Total".into(),
            payment_method: "Payment Method".into(),
            iban: "IBAN".into(),
            reference: "Reference".into(),
        }
    }
}
