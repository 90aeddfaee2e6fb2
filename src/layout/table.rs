//! Column-grid layout with variable row heights.

use super::canvas::{
    Advance, Align, Canvas, CanvasError, CellStyle, FIT_TOLERANCE, Font, FontStyle, Rgb,
};

/// Smallest size, in points, a single-line cell shrinks to before its text
/// is reported as not fitting.
const MIN_FONT_SIZE: f64 = 4.0;
const FONT_STEP: f64 = 0.5;

/// One fixed-width column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: String,
    pub width: f64,
    pub align: Align,
}

impl Column {
    pub fn new(title: impl Into<String>, width: f64, align: Align) -> Self {
        Self {
            title: title.into(),
            width,
            align,
        }
    }
}

/// Where a row ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    /// 1-based page the whole row was drawn on.
    pub page: usize,
    /// Top of the row in millimetres.
    pub y: f64,
    pub height: f64,
    /// A page was started for this row because it did not fit.
    pub broke_page: bool,
}

/// A table of fixed-width columns where one column wraps.
///
/// Every row is as tall as the wrapped text of the wrap column and all its
/// cells share that height. A row is never split: if it does not fit above
/// the bottom margin, a page is started before any of its cells is drawn.
#[derive(Debug, Clone)]
pub struct TableLayout {
    columns: Vec<Column>,
    wrap_column: usize,
    line_height: f64,
    repeat_header: bool,
}

impl TableLayout {
    /// `wrap_column` indexes `columns`; every other column holds a single
    /// line.
    pub fn new(columns: Vec<Column>, wrap_column: usize, line_height: f64) -> Self {
        Self {
            columns,
            wrap_column,
            line_height,
            repeat_header: false,
        }
    }

    /// Draw the header row again at the top of every page the table
    /// continues on.
    pub fn repeat_header(mut self, repeat: bool) -> Self {
        self.repeat_header = repeat;
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Left edge of every column relative to the table's left edge.
    pub fn offsets(&self) -> Vec<f64> {
        self.columns
            .iter()
            .scan(0.0, |x, column| {
                let offset = *x;
                *x += column.width;
                Some(offset)
            })
            .collect()
    }

    /// Draw the bold, centred, bordered header row.
    pub fn draw_header<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), CanvasError> {
        canvas.ensure_space(self.line_height)?;
        let font = canvas.font();
        canvas.set_font(Font {
            style: FontStyle::Bold,
            ..font
        });

        let left = canvas.setup().margins.left;
        let top = canvas.y();
        canvas.set_xy(left, top);
        let style = CellStyle::new(Align::Center).bordered();
        for column in &self.columns {
            canvas.cell(column.width, self.line_height, &column.title, &style, Advance::Right)?;
        }

        canvas.set_font(font);
        canvas.set_xy(left, top + self.line_height);
        Ok(())
    }

    /// Height the row would take with the current font.
    pub fn measure_row<C: Canvas + ?Sized>(
        &self,
        canvas: &C,
        cells: &[&str],
    ) -> Result<f64, CanvasError> {
        self.check_arity(cells)?;
        let column = &self.columns[self.wrap_column];
        let measured =
            canvas.measure_text_height(column.width, self.line_height, cells[self.wrap_column])?;
        Ok(measured.max(self.line_height))
    }

    /// Draw one row at the cursor and move the cursor below it.
    ///
    /// Single-line cells whose text is wider than their column are drawn
    /// with a smaller font; text that stays too wide even at the smallest
    /// size is a geometry error raised before anything is drawn.
    pub fn draw_row<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        cells: &[&str],
    ) -> Result<RowPlacement, CanvasError> {
        let height = self.measure_row(&*canvas, cells)?;
        let fonts = self.cell_fonts(canvas, cells)?;

        let mut broke_page = false;
        if !canvas.fits(height) || canvas.page() == 0 {
            canvas.add_page()?;
            broke_page = true;
            if self.repeat_header {
                self.draw_header(canvas)?;
            }
            if !canvas.fits(height) {
                return Err(CanvasError::Geometry(format!(
                    "row of {height:.1} mm does not fit on an empty page ({:.1} mm available)",
                    canvas.setup().break_trigger() - canvas.y()
                )));
            }
            tracing::debug!(page = canvas.page(), height, "row moved to a new page");
        }

        // the row fits: the canvas must not break pages inside it
        let auto_break = canvas.auto_page_break();
        canvas.set_auto_page_break(false);
        let drawn = self.draw_cells(canvas, cells, &fonts, height);
        canvas.set_auto_page_break(auto_break);
        let top = drawn?;

        Ok(RowPlacement {
            page: canvas.page(),
            y: top,
            height,
            broke_page,
        })
    }

    /// Draw the cells of a row at the cursor; returns the row's top.
    fn draw_cells<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        cells: &[&str],
        fonts: &[Font],
        height: f64,
    ) -> Result<f64, CanvasError> {
        let base = canvas.font();
        let left = canvas.setup().margins.left;
        let top = canvas.y();
        let columns = self.columns.iter().zip(self.offsets()).zip(fonts);
        for (index, ((column, offset), font)) in columns.enumerate() {
            canvas.set_xy(left + offset, top);
            canvas.set_font(*font);
            let style = CellStyle::new(column.align).bordered();
            let drawn = if index == self.wrap_column {
                canvas.multi_cell(column.width, self.line_height, cells[index], &style)
            } else {
                canvas.cell(column.width, height, cells[index], &style, Advance::Right)
            };
            canvas.set_font(base);
            drawn?;
        }
        canvas.set_xy(left, top + height);
        Ok(top)
    }

    /// The font of every cell: the current one, shrunk for single-line cells
    /// until their text fits on one line.
    fn cell_fonts<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        cells: &[&str],
    ) -> Result<Vec<Font>, CanvasError> {
        let mut fonts = Vec::with_capacity(cells.len());
        for (index, column) in self.columns.iter().enumerate() {
            let font = if index == self.wrap_column {
                canvas.font()
            } else {
                fit_font(canvas, column.width, self.line_height, cells[index])
                    .map_err(|e| in_column(e, column))?
            };
            fonts.push(font);
        }
        Ok(fonts)
    }

    fn check_arity(&self, cells: &[&str]) -> Result<(), CanvasError> {
        if cells.len() != self.columns.len() || self.wrap_column >= self.columns.len() {
            return Err(CanvasError::Geometry(format!(
                "row has {} cells for {} columns",
                cells.len(),
                self.columns.len()
            )));
        }
        Ok(())
    }
}

/// The current font, or a smaller size of it at which `text` fits on one
/// line of a cell `width` wide. The canvas font is left unchanged.
fn fit_font<C: Canvas + ?Sized>(
    canvas: &mut C,
    width: f64,
    line_height: f64,
    text: &str,
) -> Result<Font, CanvasError> {
    let base = canvas.font();
    let mut font = base;
    let fitted = loop {
        canvas.set_font(font);
        match canvas.measure_text_height(width, line_height, text) {
            Err(e) => break Err(e),
            Ok(height) if height <= line_height + FIT_TOLERANCE => break Ok(font),
            Ok(_) if font.size - FONT_STEP < MIN_FONT_SIZE => {
                break Err(CanvasError::Geometry(format!(
                    "{text:?} is wider than {width:.1} mm even at {:.1} pt",
                    font.size
                )));
            }
            Ok(_) => font.size -= FONT_STEP,
        }
    };
    canvas.set_font(base);
    if matches!(fitted, Ok(font) if font.size < base.size) {
        tracing::debug!(width, text, "cell font shrunk to fit");
    }
    fitted
}

fn in_column(error: CanvasError, column: &Column) -> CanvasError {
    match error {
        CanvasError::Geometry(message) => {
            CanvasError::Geometry(format!("{} column: {message}", column.title))
        }
        other => other,
    }
}

/// A single-column block of one-line rows, alternating shaded and
/// unshaded fill. The shading only groups rows visually.
#[derive(Debug, Clone)]
pub struct SummaryBand {
    width: f64,
    row_height: f64,
    shade: Rgb,
}

impl SummaryBand {
    pub fn new(width: f64, row_height: f64, shade: Rgb) -> Self {
        Self {
            width,
            row_height,
            shade,
        }
    }

    /// Total height of `rows` rows.
    pub fn height(&self, rows: usize) -> f64 {
        self.row_height * rows as f64
    }

    /// Draw the rows, keeping the band on one page. The first row is
    /// shaded; rows too wide for the band get a smaller font, down to the
    /// smallest size.
    pub fn draw<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        rows: &[String],
    ) -> Result<(), CanvasError> {
        let fonts = rows
            .iter()
            .map(|row| match fit_font(canvas, self.width, self.row_height, row) {
                Err(CanvasError::Geometry(_)) => Ok(Font {
                    size: MIN_FONT_SIZE,
                    ..canvas.font()
                }),
                fitted => fitted,
            })
            .collect::<Result<Vec<_>, _>>()?;
        canvas.ensure_space(self.height(rows.len()))?;

        let base = canvas.font();
        for (index, (row, font)) in rows.iter().zip(fonts).enumerate() {
            let fill = (index % 2 == 0).then_some(self.shade);
            let style = CellStyle::new(Align::Left).fill(fill);
            canvas.set_font(font);
            let drawn = canvas.cell(self.width, self.row_height, row, &style, Advance::NextLine);
            canvas.set_font(base);
            drawn?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableLayout {
        TableLayout::new(
            vec![
                Column::new("A", 40.0, Align::Left),
                Column::new("B", 20.0, Align::Right),
                Column::new("C", 30.0, Align::Center),
            ],
            0,
            7.0,
        )
    }

    #[test]
    fn offsets_accumulate_widths() {
        assert_eq!(table().offsets(), vec![0.0, 40.0, 60.0]);
        assert_eq!(table().width(), 90.0);
    }

    #[test]
    fn summary_height() {
        let band = SummaryBand::new(65.0, 7.0, Rgb(200, 200, 200));
        assert_eq!(band.height(4), 28.0);
    }
}
