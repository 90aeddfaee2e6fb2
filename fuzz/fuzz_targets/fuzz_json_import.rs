#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Import → export → import must not panic and must be stable.
        if let Ok(invoice) = pdf_invoicer::export::from_json(s) {
            let json = pdf_invoicer::export::to_json(&invoice).unwrap();
            let again = pdf_invoicer::export::from_json(&json).unwrap();
            assert_eq!(again, invoice);
        }
    }
});
