//! Layout engine tests against a fixed-pitch recording canvas.

use chrono::NaiveDate;
use pdf_invoicer::core::*;
use pdf_invoicer::layout::*;
use rust_decimal_macros::dec;

/// Every glyph is 2 mm wide at 10 pt; `¤` stands for a glyph the font lacks.
const GLYPH: f64 = 2.0;
const MISSING: char = '¤';

#[derive(Debug, Clone, PartialEq)]
struct Drawn {
    page: usize,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    text: String,
    size: f64,
    fill: Option<Rgb>,
    wrapped: bool,
}

struct GridCanvas {
    setup: PageSetup,
    page: usize,
    x: f64,
    y: f64,
    font: Font,
    drawn: Vec<Drawn>,
}

impl GridCanvas {
    fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            page: 0,
            x: setup.margins.left,
            y: setup.margins.top,
            font: Font::new(FontFamily::Helvetica, FontStyle::Regular, 10.0),
            drawn: Vec::new(),
        }
    }

    fn lines(&self, width: f64, text: &str) -> usize {
        let glyph = GLYPH * self.font.size / 10.0;
        text.split('\n')
            .map(|p| ((p.chars().count() as f64 * glyph) / width).ceil().max(1.0) as usize)
            .sum()
    }

    fn check(&self, text: &str) -> Result<(), CanvasError> {
        if self.page == 0 {
            return Err(CanvasError::NoPage);
        }
        match text.chars().find(|&c| c == MISSING) {
            Some(ch) => Err(CanvasError::UnsupportedGlyph {
                ch,
                font: "grid".into(),
            }),
            None => Ok(()),
        }
    }

    fn record(&mut self, width: f64, height: f64, text: &str, style: &CellStyle, wrapped: bool) {
        self.drawn.push(Drawn {
            page: self.page,
            x: self.x,
            y: self.y,
            width,
            height,
            text: text.to_string(),
            size: self.font.size,
            fill: style.fill,
            wrapped,
        });
    }

    fn texts(&self) -> Vec<&str> {
        self.drawn
            .iter()
            .filter(|d| !d.text.is_empty())
            .map(|d| d.text.as_str())
            .collect()
    }

    fn find(&self, text: &str) -> Option<&Drawn> {
        self.drawn.iter().find(|d| d.text == text)
    }
}

impl Canvas for GridCanvas {
    fn setup(&self) -> &PageSetup {
        &self.setup
    }

    fn add_page(&mut self) -> Result<(), CanvasError> {
        self.page += 1;
        self.x = self.setup.margins.left;
        self.y = self.setup.margins.top;
        Ok(())
    }

    fn page(&self) -> usize {
        self.page
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn font(&self) -> Font {
        self.font
    }

    fn measure_text_height(
        &self,
        width: f64,
        line_height: f64,
        text: &str,
    ) -> Result<f64, CanvasError> {
        if text.contains(MISSING) {
            return Err(CanvasError::UnsupportedGlyph {
                ch: MISSING,
                font: "grid".into(),
            });
        }
        Ok(self.lines(width, text) as f64 * line_height)
    }

    fn cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        style: &CellStyle,
        advance: Advance,
    ) -> Result<(), CanvasError> {
        self.check(text)?;
        self.record(width, height, text, style, false);
        match advance {
            Advance::Right => self.x += width,
            Advance::NextLine => {
                self.x = self.setup.margins.left;
                self.y += height;
            }
            Advance::Below => self.y += height,
        }
        Ok(())
    }

    fn multi_cell(
        &mut self,
        width: f64,
        line_height: f64,
        text: &str,
        style: &CellStyle,
    ) -> Result<(), CanvasError> {
        self.check(text)?;
        let height = self.lines(width, text) as f64 * line_height;
        self.record(width, height, text, style, true);
        self.x = self.setup.margins.left;
        self.y += height;
        Ok(())
    }

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn set_xy(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    fn ln(&mut self, height: f64) {
        self.x = self.setup.margins.left;
        self.y += height;
    }

    fn finish(&mut self) -> Result<Vec<u8>, CanvasError> {
        Ok(Vec::new())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn party(name: &str) -> Party {
    PartyBuilder::new(
        name,
        AddressBuilder::new("Main", "12", "08001", "Barcelona", "Spain")
            .build()
            .unwrap(),
        "B12345678",
    )
    .build()
    .unwrap()
}

fn builder() -> InvoiceBuilder {
    let issuer = party("Acme SL");
    InvoiceBuilder::new("F-2024-001", date(2024, 3, 1))
        .due_date(date(2024, 3, 31))
        .issuer(
            IssuerBuilder::new(issuer.name, issuer.address, issuer.tax_id)
                .build()
                .unwrap(),
        )
        .client(party("Client SA"))
}

fn item(description: &str) -> LineItem {
    LineItem::new(description, dec!(10), dec!(50), dec!(0.21)).unwrap()
}

fn render(invoice: &Invoice) -> (GridCanvas, RenderReport) {
    let style = DocumentStyle::default();
    let mut canvas = GridCanvas::new(style.page);
    let report = render_invoice(invoice, &style, &mut canvas).unwrap();
    (canvas, report)
}

fn table() -> TableLayout {
    item_table(&DocumentStyle::default())
}

fn cells(description: &str) -> [&str; 6] {
    [description, "1.00", "50.000 EUR", "21%", "10.50 EUR", "60.50 EUR"]
}

// --- Table layout engine ---

#[test]
fn row_height_is_uniform_across_columns() {
    let mut canvas = GridCanvas::new(PageSetup::default());
    canvas.add_page().unwrap();
    // 60 mm column at 2 mm per glyph: 70 glyphs wrap onto 3 lines
    let description = "x".repeat(70);
    let placement = table().draw_row(&mut canvas, &cells(&description)).unwrap();

    assert_eq!(placement.height, 21.0);
    assert!(!placement.broke_page);
    for drawn in &canvas.drawn {
        assert_eq!(drawn.y, placement.y);
        assert_eq!(drawn.height, 21.0);
    }
    let xs: Vec<f64> = canvas.drawn.iter().map(|d| d.x).collect();
    assert_eq!(xs, [10.0, 70.0, 90.0, 120.0, 140.0, 170.0]);
    assert_eq!(canvas.y(), placement.y + 21.0);
    assert_eq!(canvas.x(), 10.0);
}

#[test]
fn row_that_does_not_fit_moves_whole_to_next_page() {
    let mut canvas = GridCanvas::new(PageSetup::default());
    canvas.add_page().unwrap();
    // 14 mm left above the bottom margin, the row needs 21 mm
    canvas.set_y(PageSetup::default().break_trigger() - 14.0);
    let description = "x".repeat(70);
    let placement = table().draw_row(&mut canvas, &cells(&description)).unwrap();

    assert_eq!(placement.page, 2);
    assert!(placement.broke_page);
    let row: Vec<&Drawn> = canvas.drawn.iter().filter(|d| d.height == 21.0).collect();
    assert_eq!(row.len(), 6);
    assert!(row.iter().all(|d| d.page == 2 && d.y == placement.y));
    assert!(canvas.drawn.iter().all(|d| d.page == 2));
}

#[test]
fn header_repeats_on_continuation_page() {
    let mut canvas = GridCanvas::new(PageSetup::default());
    canvas.add_page().unwrap();
    canvas.set_y(282.0);
    let placement = table()
        .repeat_header(true)
        .draw_row(&mut canvas, &cells("short"))
        .unwrap();

    assert_eq!(placement.page, 2);
    let header = canvas.find("Description").unwrap();
    assert_eq!(header.page, 2);
    assert_eq!(header.y, 10.0);
    assert_eq!(placement.y, 17.0);
}

#[test]
fn row_taller_than_a_page_is_an_error() {
    let mut canvas = GridCanvas::new(PageSetup::default());
    canvas.add_page().unwrap();
    // 41 lines of 7 mm exceed the 277 mm printable height
    let description = "x\n".repeat(40) + "x";
    let err = table().draw_row(&mut canvas, &cells(&description)).unwrap_err();
    assert!(matches!(err, CanvasError::Geometry(_)));
    assert!(canvas.drawn.iter().all(|d| d.text != "60.50 EUR"));
}

#[test]
fn wide_amount_is_drawn_smaller() {
    let mut canvas = GridCanvas::new(PageSetup::default());
    canvas.add_page().unwrap();
    // 20 glyphs are 40 mm at 10 pt; the 30 mm column needs 7.5 pt
    let total = "1234567890123456 EUR";
    let cells = ["Consulting", "1.00", "50.000 EUR", "21%", "10.50 EUR", total];
    let placement = table().draw_row(&mut canvas, &cells).unwrap();

    let drawn = canvas.find(total).unwrap();
    assert_eq!(drawn.size, 7.5);
    assert_eq!(drawn.height, placement.height);
    assert_eq!(canvas.find("10.50 EUR").unwrap().size, 10.0);
    assert_eq!(canvas.font().size, 10.0);
}

#[test]
fn amount_too_wide_at_any_size_is_an_error() {
    let mut canvas = GridCanvas::new(PageSetup::default());
    canvas.add_page().unwrap();
    let total = "9".repeat(80);
    let cells = ["Consulting", "1.00", "50.000 EUR", "21%", "10.50 EUR", total.as_str()];
    let err = table().draw_row(&mut canvas, &cells).unwrap_err();
    assert!(matches!(err, CanvasError::Geometry(ref m) if m.starts_with("Total column")));
    assert!(canvas.drawn.is_empty());
    assert_eq!(canvas.font().size, 10.0);
}

#[test]
fn wrong_cell_count_is_an_error() {
    let mut canvas = GridCanvas::new(PageSetup::default());
    canvas.add_page().unwrap();
    let err = table().draw_row(&mut canvas, &["only", "two"]).unwrap_err();
    assert!(matches!(err, CanvasError::Geometry(_)));
    assert!(canvas.drawn.is_empty());
}

#[test]
fn summary_band_alternates_fill() {
    let mut canvas = GridCanvas::new(PageSetup::default());
    canvas.add_page().unwrap();
    let shade = Rgb(200, 200, 200);
    let rows: Vec<String> = (1..=5).map(|i| format!("row {i}")).collect();
    SummaryBand::new(65.0, 7.0, shade).draw(&mut canvas, &rows).unwrap();

    let fills: Vec<Option<Rgb>> = canvas.drawn.iter().map(|d| d.fill).collect();
    assert_eq!(fills, [Some(shade), None, Some(shade), None, Some(shade)]);
}

// --- Document assembler ---

#[test]
fn blocks_are_drawn_in_order() {
    let invoice = builder()
        .add_item(item("Consulting"))
        .notes("Thank you")
        .reference("PO-77")
        .build()
        .unwrap();
    let (canvas, report) = render(&invoice);
    assert_eq!(report.pages, 1);

    let texts = canvas.texts();
    let position = |needle: &str| {
        texts
            .iter()
            .position(|t| *t == needle)
            .unwrap_or_else(|| panic!("{needle:?} not drawn in {texts:?}"))
    };
    let order = [
        position("INVOICE - F-2024-001"),
        position("From:"),
        position("Client SA"),
        position("NIF: B12345678"),
        position("Invoice Summary"),
        position("Invoice Number: F-2024-001"),
        position("Description"),
        position("Consulting"),
        position("Thank you"),
        position("Reference: PO-77"),
    ];
    assert!(order.windows(2).all(|w| w[0] < w[1]), "{order:?}");
    assert_eq!(
        texts.iter().filter(|t| **t == "Total Amount: 605.00 EUR").count(),
        2
    );
}

#[test]
fn item_row_shows_formatted_amounts() {
    let invoice = builder().add_item(item("Consulting")).build().unwrap();
    let (canvas, report) = render(&invoice);
    let row = report.rows[0];
    let texts: Vec<&str> = canvas
        .drawn
        .iter()
        .filter(|d| d.page == row.page && d.y == row.y && d.height == row.height)
        .map(|d| d.text.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    assert_eq!(
        texts,
        ["Consulting", "10.00", "50.000 EUR", "21%", "105.00 EUR", "605.00 EUR"]
    );
}

#[test]
fn operation_date_is_omitted_when_equal_to_emission() {
    let invoice = builder().add_item(item("Consulting")).build().unwrap();
    let (canvas, _) = render(&invoice);
    assert!(canvas.find("Emission Date: 01/03/2024").is_some());
    assert!(canvas.texts().iter().all(|t| !t.starts_with("Operation Date")));

    let invoice = builder()
        .operation_date(date(2024, 3, 5))
        .add_item(item("Consulting"))
        .build()
        .unwrap();
    let (canvas, _) = render(&invoice);
    assert!(canvas.find("Operation Date: 05/03/2024").is_some());
}

#[test]
fn optional_blocks_only_when_present() {
    let invoice = builder().add_item(item("Consulting")).build().unwrap();
    let (canvas, _) = render(&invoice);
    let texts = canvas.texts();
    assert!(texts.iter().all(|t| !t.starts_with("Reference")));
    assert!(texts.iter().all(|t| !t.starts_with("Status")));
    assert!(texts.iter().all(|t| !t.starts_with("IBAN")));
    assert!(!canvas.drawn.iter().any(|d| d.wrapped && d.width == 190.0));
}

#[test]
fn paid_flag_and_payment_details() {
    let issuer = IssuerBuilder::new("Acme SL", party("Acme SL").address, "B12345678")
        .iban("ES91 2100 0418 4502 0005 1332")
        .build()
        .unwrap();
    let invoice = builder()
        .issuer(issuer)
        .add_item(item("Consulting"))
        .payment_method("Bank transfer")
        .paid(true)
        .build()
        .unwrap();
    let (canvas, _) = render(&invoice);
    assert!(canvas.find("Status: Paid").is_some());
    assert!(canvas.find("Payment Method: Bank transfer").is_some());
    assert!(canvas.find("IBAN: ES91 2100 0418 4502 0005 1332").is_some());
}

#[test]
fn long_invoices_never_split_rows() {
    let items: Vec<LineItem> = (0..60)
        .map(|i| item(&format!("Item {i} {}", "word ".repeat(i % 20))))
        .collect();
    let invoice = builder().items(items).build().unwrap();
    let (canvas, report) = render(&invoice);

    assert!(report.pages > 1);
    assert_eq!(report.rows.len(), 60);
    let bottom = PageSetup::default().break_trigger();
    for row in &report.rows {
        assert!(row.y + row.height <= bottom + 1e-9, "{row:?}");
    }
    for pair in report.rows.windows(2) {
        assert!(pair[1].page >= pair[0].page);
    }
    let headers = canvas.drawn.iter().filter(|d| d.text == "Description").count();
    assert_eq!(headers, report.rows.last().unwrap().page - report.rows[0].page + 1);
}

#[test]
fn unsupported_glyph_names_the_row() {
    let invoice = builder()
        .add_item(item("Consulting"))
        .add_item(item("Bad ¤ glyph"))
        .build()
        .unwrap();
    let style = DocumentStyle::default();
    let mut canvas = GridCanvas::new(style.page);
    let err = render_invoice(&invoice, &style, &mut canvas).unwrap_err();
    match err {
        InvoiceError::Layout { context, source } => {
            assert_eq!(context, "item row 2");
            assert!(matches!(source, CanvasError::UnsupportedGlyph { ch: '¤', .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unusable_style_is_rejected_before_drawing() {
    let invoice = builder().add_item(item("Consulting")).build().unwrap();
    let mut style = DocumentStyle::default();
    style.columns.description = 150.0;
    let mut canvas = GridCanvas::new(style.page);
    let err = render_invoice(&invoice, &style, &mut canvas).unwrap_err();
    assert!(matches!(err, InvoiceError::Layout { ref context, .. } if context == "document style"));
    assert_eq!(canvas.page(), 0);
}

#[test]
fn rendering_is_repeatable_and_leaves_the_invoice_alone() {
    let invoice = builder()
        .add_item(item("Consulting"))
        .add_item(item(&"long description ".repeat(8)))
        .build()
        .unwrap();
    let before = invoice.clone();
    let (first, _) = render(&invoice);
    let (second, _) = render(&invoice);
    assert_eq!(first.drawn, second.drawn);
    assert_eq!(invoice, before);
}
