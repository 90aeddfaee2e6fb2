use chrono::NaiveDate;
use pdf_invoicer::core::*;
use pdf_invoicer::layout::DocumentStyle;
use rust_decimal_macros::dec;

fn main() {
    let invoice = InvoiceBuilder::new("F-2024-001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
        .operation_date(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap())
        .due_date(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap())
        .issuer(
            IssuerBuilder::new(
                "Acme Consulting SL",
                AddressBuilder::new("Carrer de Balmes", "150", "08008", "Barcelona", "Spain")
                    .floor("4")
                    .door("1a")
                    .build()
                    .expect("issuer address should be valid"),
                "B12345678",
            )
            .iban("ES91 2100 0418 4502 0005 1332")
            .email("billing@acme.example")
            .build()
            .expect("issuer should be valid"),
        )
        .client(
            PartyBuilder::new(
                "Client SA",
                AddressBuilder::new("Gran Via", "1", "28013", "Madrid", "Spain")
                    .state("Madrid")
                    .build()
                    .expect("client address should be valid"),
                "A87654321",
            )
            .build()
            .expect("client should be valid"),
        )
        .add_item(
            LineItem::new(
                "Architecture review of the billing platform, including a written report",
                dec!(12),
                dec!(85),
                dec!(0.21),
            )
            .expect("item should be valid"),
        )
        .add_item(LineItem::new("Hosting (monthly)", dec!(1), dec!(49.90), dec!(0.21)).expect("item should be valid"))
        .add_item(LineItem::new("Printed manuals", dec!(3), dec!(12.5), dec!(0.04)).expect("item should be valid"))
        .payment_method("Bank transfer")
        .notes("Payment within 30 days of the due date.")
        .reference("PO-2024-117")
        .build()
        .expect("invoice should be valid");

    let totals = invoice.totals();
    println!("Invoice: {}", invoice.number());
    println!("Issuer:  {}", invoice.issuer().party.name);
    println!("Client:  {}", invoice.client().name);
    println!("---");
    for item in invoice.items() {
        println!(
            "  {} x {} @ {} = {}",
            money::format_quantity(item.quantity()),
            item.description(),
            money::format_unit_price(item.unit_price(), "EUR"),
            money::format_amount(item.total(), "EUR"),
        );
    }
    println!("---");
    println!("Net:   {}", money::format_amount(totals.net_total, "EUR"));
    println!("VAT:   {}", money::format_amount(totals.vat_total, "EUR"));
    println!("Gross: {}", money::format_amount(totals.gross_total, "EUR"));

    let path = std::env::temp_dir().join("basic_invoice.pdf");
    match pdf_invoicer::pdf::generate_pdf(&invoice, &DocumentStyle::default(), &path) {
        Ok(report) => println!("Written {} ({} page(s))", path.display(), report.pages),
        Err(e) => eprintln!("Rendering failed: {e}"),
    }
}
