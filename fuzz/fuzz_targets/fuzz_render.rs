#![no_main]

use libfuzzer_sys::fuzz_target;
use pdf_invoicer::layout::DocumentStyle;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Any valid record either renders or fails with an error, never a panic.
        if let Ok(invoice) = pdf_invoicer::export::from_json(s) {
            if let Ok((_, report)) = pdf_invoicer::pdf::render_pdf(&invoice, &DocumentStyle::default()) {
                assert_eq!(report.rows.len(), invoice.items().len());
            }
        }
    }
});
