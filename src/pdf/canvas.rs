use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

use super::metrics;
use crate::layout::{
    Advance, Align, Canvas, CanvasError, CellStyle, Font, FontFamily, FontStyle, PageSetup, Rgb,
};

/// Points per millimetre.
const K: f64 = 72.0 / 25.4;
/// Horizontal padding inside a cell, in millimetres.
pub const CELL_MARGIN: f64 = 1.0;
const LINE_WIDTH: f64 = 0.2;
const PRODUCER: &str = concat!("pdf-invoicer ", env!("CARGO_PKG_VERSION"));

/// One drawing instruction, in page millimetres from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its baseline at `y`.
    Text {
        x: f64,
        y: f64,
        font: Font,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Rgb>,
        stroke: bool,
    },
}

/// Everything drawn on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// The text runs of the page in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rect { .. } => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

/// A [`Canvas`] that records pages in memory and serializes them as a PDF
/// using the built-in Helvetica and Courier fonts.
///
/// Text is limited to the WinAnsi character set; anything else fails with
/// [`CanvasError::UnsupportedGlyph`] before the cell is drawn.
#[derive(Debug, Clone)]
pub struct PdfCanvas {
    setup: PageSetup,
    pages: Vec<Page>,
    font: Font,
    x: f64,
    y: f64,
    auto_page_break: bool,
}

impl PdfCanvas {
    pub fn new(setup: PageSetup) -> Self {
        Self {
            x: setup.margins.left,
            y: setup.margins.top,
            setup,
            pages: Vec::new(),
            font: Font::new(FontFamily::Helvetica, FontStyle::Regular, 10.0),
            auto_page_break: true,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Width of `text` in millimetres with the current font.
    pub fn text_width(&self, text: &str) -> Result<f64, CanvasError> {
        let mut units = 0u64;
        for ch in text.chars() {
            units += u64::from(self.glyph_width(ch)?);
        }
        Ok(units as f64 * self.font.size / 1000.0 / K)
    }

    fn glyph_width(&self, ch: char) -> Result<u16, CanvasError> {
        metrics::glyph_width(self.font.family, self.font.style, ch).ok_or_else(|| {
            CanvasError::UnsupportedGlyph {
                ch,
                font: metrics::base_font(self.font.family, self.font.style).to_string(),
            }
        })
    }

    /// Break `text` into lines no wider than `width` minus the cell margins.
    /// Explicit newlines always break; words longer than a line are split
    /// between characters.
    pub fn wrap(&self, width: f64, text: &str) -> Result<Vec<String>, CanvasError> {
        let max = width - 2.0 * CELL_MARGIN;
        if !max.is_finite() || max <= 0.0 {
            return Err(CanvasError::Geometry(format!(
                "text width {width:.2} mm leaves no room inside the cell margins"
            )));
        }
        let space = self.text_width(" ")?;

        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
            let mut line = String::new();
            let mut line_width = 0.0;
            let mut first = true;
            for word in paragraph.split(' ') {
                let word_width = self.text_width(word)?;
                let gap = if first { 0.0 } else { space };
                if line_width + gap + word_width <= max + 1e-9 {
                    if !first {
                        line.push(' ');
                    }
                    line.push_str(word);
                    line_width += gap + word_width;
                    first = false;
                    continue;
                }

                if !first {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0.0;
                }
                first = false;
                if word_width <= max + 1e-9 {
                    line.push_str(word);
                    line_width = word_width;
                    continue;
                }
                for ch in word.chars() {
                    let ch_width = self.text_width(ch.encode_utf8(&mut [0; 4]))?;
                    if line_width + ch_width > max + 1e-9 && !line.is_empty() {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0.0;
                    }
                    line.push(ch);
                    line_width += ch_width;
                }
            }
            lines.push(line);
        }
        Ok(lines)
    }

    fn current_page(&mut self) -> Result<&mut Page, CanvasError> {
        self.pages.last_mut().ok_or(CanvasError::NoPage)
    }

    fn check_width(width: f64) -> Result<(), CanvasError> {
        if width.is_finite() && width > 0.0 {
            Ok(())
        } else {
            Err(CanvasError::Geometry(format!("cell width {width} mm")))
        }
    }

    /// Move to a new page when a block of `height` at the cursor would cross
    /// the bottom margin, unless the cursor already is at the page top.
    fn auto_break(&mut self, height: f64) -> Result<(), CanvasError> {
        if self.auto_page_break
            && !self.fits(height)
            && self.y > self.setup.margins.top + 1e-9
        {
            let x = self.x;
            self.add_page()?;
            self.x = x;
        }
        Ok(())
    }

    fn draw_box(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: &CellStyle,
    ) -> Result<(), CanvasError> {
        if style.fill.is_none() && !style.border {
            return Ok(());
        }
        self.current_page()?.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill: style.fill,
            stroke: style.border,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        text: &str,
        style: &CellStyle,
    ) -> Result<(), CanvasError> {
        if text.is_empty() {
            return Ok(());
        }
        let text_width = self.text_width(text)?;
        let dx = match style.align {
            Align::Left => CELL_MARGIN,
            Align::Center => (width - text_width) / 2.0,
            Align::Right => width - CELL_MARGIN - text_width,
        };
        let baseline = y + height / 2.0 + 0.3 * self.font.size / K;
        let font = self.font;
        self.current_page()?.ops.push(DrawOp::Text {
            x: x + dx,
            y: baseline,
            font,
            color: style.text_color,
            text: text.to_string(),
        });
        Ok(())
    }

    /// Serialize the recorded pages.
    fn build_document(&self) -> Result<Document, CanvasError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for family in [FontFamily::Helvetica, FontFamily::Courier] {
            for style in [FontStyle::Regular, FontStyle::Bold] {
                let font_id = doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => metrics::base_font(family, style),
                    "Encoding" => "WinAnsiEncoding",
                });
                fonts.set(font_resource(family, style), Object::Reference(font_id));
            }
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            (self.setup.width() * K).into(),
            (self.setup.height() * K).into(),
        ];
        let mut kids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content = encode_page(page, self.setup.height())?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => media_box.clone(),
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));
        Ok(doc)
    }
}

impl Canvas for PdfCanvas {
    fn setup(&self) -> &PageSetup {
        &self.setup
    }

    fn add_page(&mut self) -> Result<(), CanvasError> {
        self.pages.push(Page::default());
        self.x = self.setup.margins.left;
        self.y = self.setup.margins.top;
        tracing::trace!(page = self.pages.len(), "page added");
        Ok(())
    }

    fn page(&self) -> usize {
        self.pages.len()
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
        Ok(self.wrap(width, text)?.len() as f64 * line_height)
    }

    fn cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        style: &CellStyle,
        advance: Advance,
    ) -> Result<(), CanvasError> {
        Self::check_width(width)?;
        if self.pages.is_empty() {
            return Err(CanvasError::NoPage);
        }
        // validate every glyph before anything is recorded
        self.text_width(text)?;
        self.auto_break(height)?;

        let (x, y) = (self.x, self.y);
        self.draw_box(x, y, width, height, style)?;
        self.draw_text(x, y, width, height, text, style)?;

        match advance {
            Advance::Right => self.x = x + width,
            Advance::NextLine => {
                self.x = self.setup.margins.left;
                self.y = y + height;
            }
            Advance::Below => self.y = y + height,
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
        Self::check_width(width)?;
        if self.pages.is_empty() {
            return Err(CanvasError::NoPage);
        }
        let lines = self.wrap(width, text)?;
        let x = self.x;
        let line_style = CellStyle {
            border: false,
            fill: None,
            ..*style
        };

        // one box per page the text runs over; lines sit at top + n * height
        let mut segment = self.segment_start();
        let mut segment_lines = 0usize;
        for line in &lines {
            let (page, y) = (self.pages.len(), segment.0 + segment_lines as f64 * line_height);
            self.y = y;
            self.auto_break(line_height)?;
            if self.pages.len() != page {
                self.insert_box(page, segment, y, x, width, style)?;
                segment = self.segment_start();
                segment_lines = 0;
            }
            let y = self.y;
            self.draw_text(x, y, width, line_height, line, &line_style)?;
            segment_lines += 1;
        }
        self.y = segment.0 + segment_lines as f64 * line_height;
        let (page, y) = (self.pages.len(), self.y);
        self.insert_box(page, segment, y, x, width, style)?;

        self.x = self.setup.margins.left;
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

    fn auto_page_break(&self) -> bool {
        self.auto_page_break
    }

    /// Toggle the page break that cells and wrapped lines start on their own
    /// when they would cross the bottom margin.
    fn set_auto_page_break(&mut self, enabled: bool) {
        self.auto_page_break = enabled;
    }

    fn finish(&mut self) -> Result<Vec<u8>, CanvasError> {
        if self.pages.is_empty() {
            return Err(CanvasError::NoPage);
        }
        let mut doc = self.build_document()?;
        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| CanvasError::Encoding(format!("failed to save PDF: {e}")))?;
        Ok(output)
    }
}

impl PdfCanvas {
    /// Top and first op index of a multi-cell segment on the current page.
    fn segment_start(&self) -> (f64, usize) {
        (self.y, self.pages.last().map_or(0, |p| p.ops.len()))
    }

    /// Box from the segment top down to `bottom` on the 1-based `page`,
    /// placed underneath the segment's text.
    fn insert_box(
        &mut self,
        page: usize,
        (top, index): (f64, usize),
        bottom: f64,
        x: f64,
        width: f64,
        style: &CellStyle,
    ) -> Result<(), CanvasError> {
        if (style.fill.is_none() && !style.border) || bottom <= top {
            return Ok(());
        }
        let target = page
            .checked_sub(1)
            .and_then(|i| self.pages.get_mut(i))
            .ok_or(CanvasError::NoPage)?;
        target.ops.insert(
            index.min(target.ops.len()),
            DrawOp::Rect {
                x,
                y: top,
                width,
                height: bottom - top,
                fill: style.fill,
                stroke: style.border,
            },
        );
        Ok(())
    }
}

fn font_resource(family: FontFamily, style: FontStyle) -> &'static str {
    match (family, style) {
        (FontFamily::Helvetica, FontStyle::Regular) => "F1",
        (FontFamily::Helvetica, FontStyle::Bold) => "F2",
        (FontFamily::Courier, FontStyle::Regular) => "F3",
        (FontFamily::Courier, FontStyle::Bold) => "F4",
    }
}

/// Content stream of one page. Coordinates flip to the PDF bottom-left
/// origin here.
fn encode_page(page: &Page, page_height: f64) -> Result<Vec<u8>, CanvasError> {
    let mut operations = vec![Operation::new("w", vec![(LINE_WIDTH * K).into()])];

    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                if let Some(fill) = fill {
                    operations.push(Operation::new("rg", color(*fill)));
                }
                operations.push(Operation::new(
                    "re",
                    vec![
                        (x * K).into(),
                        ((page_height - y) * K).into(),
                        (width * K).into(),
                        (-height * K).into(),
                    ],
                ));
                let paint = match (fill.is_some(), *stroke) {
                    (true, true) => "B",
                    (true, false) => "f",
                    (false, _) => "S",
                };
                operations.push(Operation::new(paint, vec![]));
            }
            DrawOp::Text {
                x,
                y,
                font,
                color: text_color,
                text,
            } => {
                let resource = font_resource(font.family, font.style);
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![Object::Name(resource.into()), font.size.into()]),
                    Operation::new("rg", color(*text_color)),
                    Operation::new("Td", vec![(x * K).into(), ((page_height - y) * K).into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(encode_text(text)?, StringFormat::Literal)],
                    ),
                    Operation::new("ET", vec![]),
                ]);
            }
        }
    }

    Content { operations }
        .encode()
        .map_err(|e| CanvasError::Encoding(format!("failed to encode page content: {e}")))
}

/// WinAnsi bytes of `text`.
fn encode_text(text: &str) -> Result<Vec<u8>, CanvasError> {
    text.chars()
        .map(|ch| {
            metrics::encode_char(ch)
                .ok_or_else(|| CanvasError::Encoding(format!("{ch:?} has no WinAnsi code")))
        })
        .collect()
}

fn color(Rgb(r, g, b): Rgb) -> Vec<Object> {
    [r, g, b]
        .into_iter()
        .map(|v| (f64::from(v) / 255.0).into())
        .collect()
}
