use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Slack in millimetres allowed when checking content against the bottom
/// margin, so that sums of fractional line heights compare equal to the
/// product the layout measured.
pub const FIT_TOLERANCE: f64 = 1e-6;

/// Failures reported by a [`Canvas`].
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CanvasError {
    /// The current font cannot represent a character of the text.
    #[error("unsupported glyph {ch:?} for font {font}")]
    UnsupportedGlyph { ch: char, font: String },

    /// A size or position is unusable (non-positive width, content taller
    /// than a page, ...).
    #[error("invalid geometry: {0}")]
    Geometry(String),

    /// Drawing was attempted before the first page was added.
    #[error("no page has been started")]
    NoPage,

    /// The finished document could not be serialized.
    #[error("encoding failed: {0}")]
    Encoding(String),
}

/// Paper size in millimetres (portrait).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4: Self = Self {
        width: 210.0,
        height: 297.0,
    };
    pub const LETTER: Self = Self {
        width: 215.9,
        height: 279.4,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
}

/// Page geometry shared by the canvas and the layout code. All values are
/// millimetres with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub size: PageSize,
    pub orientation: Orientation,
    pub margins: Margins,
    /// Distance from the bottom edge at which content must stop.
    pub bottom_margin: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            orientation: Orientation::Portrait,
            margins: Margins {
                left: 10.0,
                top: 10.0,
                right: 10.0,
            },
            bottom_margin: 10.0,
        }
    }
}

impl PageSetup {
    pub fn width(&self) -> f64 {
        match self.orientation {
            Orientation::Portrait => self.size.width,
            Orientation::Landscape => self.size.height,
        }
    }

    pub fn height(&self) -> f64 {
        match self.orientation {
            Orientation::Portrait => self.size.height,
            Orientation::Landscape => self.size.width,
        }
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> f64 {
        self.width() - self.margins.left - self.margins.right
    }

    /// The lowest y any content may reach.
    pub fn break_trigger(&self) -> f64 {
        self.height() - self.bottom_margin
    }

    /// Vertical space of an empty page.
    pub fn content_height(&self) -> f64 {
        self.break_trigger() - self.margins.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Helvetica,
    Courier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Regular,
    Bold,
}

/// Font selection; `size` is in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub family: FontFamily,
    pub style: FontStyle,
    pub size: f64,
}

impl Font {
    pub fn new(family: FontFamily, style: FontStyle, size: f64) -> Self {
        Self {
            family,
            style,
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);
}

/// How a cell is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub border: bool,
    pub align: Align,
    /// Background; `None` leaves the cell unfilled.
    pub fill: Option<Rgb>,
    pub text_color: Rgb,
}

impl CellStyle {
    pub fn new(align: Align) -> Self {
        Self {
            border: false,
            align,
            fill: None,
            text_color: Rgb::BLACK,
        }
    }

    pub fn bordered(mut self) -> Self {
        self.border = true;
        self
    }

    pub fn fill(mut self, fill: Option<Rgb>) -> Self {
        self.fill = fill;
        self
    }
}

/// Where the cursor goes after a single-line cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// To the right edge of the cell, same y.
    Right,
    /// To the left margin, below the cell.
    NextLine,
    /// Below the cell, same x.
    Below,
}

/// The page-drawing primitive the layout code runs against.
///
/// Implementations own the cursor and the current page; one canvas renders
/// one document. Single-line cells may trigger the implementation's own
/// automatic page break, which works per cell; callers that must keep a
/// group of cells together check [`Canvas::fits`] first.
pub trait Canvas {
    fn setup(&self) -> &PageSetup;

    /// Start a new page and move the cursor to its top-left margin.
    fn add_page(&mut self) -> Result<(), CanvasError>;

    /// 1-based number of the current page; 0 before the first page.
    fn page(&self) -> usize;

    fn set_font(&mut self, font: Font);

    fn font(&self) -> Font;

    /// Height `text` would occupy in a [`Canvas::multi_cell`] of `width`,
    /// without drawing anything.
    fn measure_text_height(
        &self,
        width: f64,
        line_height: f64,
        text: &str,
    ) -> Result<f64, CanvasError>;

    /// Draw a single-line cell at the cursor.
    fn cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        style: &CellStyle,
        advance: Advance,
    ) -> Result<(), CanvasError>;

    /// Draw wrapped text at the cursor, one `line_height` per line. The
    /// cursor ends at the left margin below the text.
    fn multi_cell(
        &mut self,
        width: f64,
        line_height: f64,
        text: &str,
        style: &CellStyle,
    ) -> Result<(), CanvasError>;

    fn x(&self) -> f64;

    fn y(&self) -> f64;

    fn set_xy(&mut self, x: f64, y: f64);

    /// Move to the left margin, `height` below the cursor.
    fn ln(&mut self, height: f64);

    /// Serialize every page drawn so far.
    fn finish(&mut self) -> Result<Vec<u8>, CanvasError>;

    /// Whether cells may start a page on their own when they would cross
    /// the bottom margin. Canvases that never break pages keep the default.
    fn auto_page_break(&self) -> bool {
        false
    }

    fn set_auto_page_break(&mut self, _enabled: bool) {}

    /// Move to the left margin at `y`.
    fn set_y(&mut self, y: f64) {
        let left = self.setup().margins.left;
        self.set_xy(left, y);
    }

    /// Whether `height` fits between the cursor and the bottom margin.
    fn fits(&self, height: f64) -> bool {
        self.y() + height <= self.setup().break_trigger() + FIT_TOLERANCE
    }

    /// Add a page unless `height` fits on the current one. Returns whether a
    /// page was added.
    fn ensure_space(&mut self, height: f64) -> Result<bool, CanvasError> {
        if self.page() > 0 && self.fits(height) {
            return Ok(false);
        }
        self.add_page()?;
        Ok(true)
    }
}
