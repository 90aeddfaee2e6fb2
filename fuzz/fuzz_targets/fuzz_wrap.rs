#![no_main]

use libfuzzer_sys::fuzz_target;
use pdf_invoicer::layout::{Canvas, PageSetup};
use pdf_invoicer::pdf::{CELL_MARGIN, PdfCanvas};

fuzz_target!(|data: (u8, &str)| {
    let (width, text) = data;
    let width = 5.0 + f64::from(width);
    let canvas = PdfCanvas::new(PageSetup::default());
    if let Ok(lines) = canvas.wrap(width, text) {
        // Every wrapped line fits unless it is a single glyph.
        for line in &lines {
            let fits = canvas.text_width(line).unwrap() <= width - 2.0 * CELL_MARGIN + 1e-9;
            assert!(fits || line.chars().count() <= 1);
        }
        let height = canvas.measure_text_height(width, 5.0, text).unwrap();
        assert_eq!(height, lines.len() as f64 * 5.0);
    }
});
