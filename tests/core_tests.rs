use chrono::NaiveDate;
use pdf_invoicer::core::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn address() -> Address {
    AddressBuilder::new("Main", "12", "08001", "Barcelona", "Spain")
        .build()
        .unwrap()
}

fn issuer() -> Issuer {
    IssuerBuilder::new("Acme SL", address(), "B12345678")
        .iban("ES91 2100 0418 4502 0005 1332")
        .email("billing@acme.example")
        .build()
        .unwrap()
}

fn client() -> Client {
    PartyBuilder::new("Client SA", address(), "A87654321")
        .build()
        .unwrap()
}

fn consulting() -> LineItem {
    LineItem::new("Consulting", dec!(10), dec!(50.0), dec!(0.21)).unwrap()
}

fn record() -> InvoiceRecord {
    InvoiceRecord {
        schema_version: SCHEMA_VERSION,
        number: "F-2024-001".into(),
        emission_date: date(2024, 3, 1),
        operation_date: date(2024, 3, 1),
        due_date: date(2024, 3, 31),
        issuer: issuer(),
        client: client(),
        items: vec![consulting().into()],
        totals: Totals::default(),
        payment_method: None,
        notes: None,
        reference: None,
        paid: false,
    }
}

fn first_error(record: InvoiceRecord) -> ValidationError {
    Invoice::try_from(record).unwrap_err()
}

// --- Calculation ---

#[test]
fn consulting_example() {
    let item = consulting();
    assert_eq!(item.vat_amount(), dec!(105));
    assert_eq!(item.total(), dec!(605));

    let invoice = InvoiceBuilder::new("F-2024-001", date(2024, 3, 1))
        .issuer(issuer())
        .client(client())
        .add_item(item)
        .build()
        .unwrap();
    let totals = invoice.totals();
    assert_eq!(totals.net_total, dec!(500));
    assert_eq!(totals.vat_total, dec!(105));
    assert_eq!(totals.gross_total, dec!(605));
}

#[test]
fn amounts_are_not_rounded_before_display() {
    let item = LineItem::new("Tiny", dec!(3), dec!(0.333), dec!(0.21)).unwrap();
    assert_eq!(item.vat_amount(), dec!(0.20979));
    assert_eq!(item.total(), dec!(1.20879));
    assert_eq!(money::format_amount(item.total(), "EUR"), "1.21 EUR");
}

#[test]
fn push_item_recomputes_totals() {
    let mut invoice = InvoiceBuilder::new("F-1", date(2024, 3, 1))
        .issuer(issuer())
        .client(client())
        .add_item(consulting())
        .build()
        .unwrap();
    invoice
        .push_item(LineItem::new("Support", dec!(1), dec!(100), dec!(0.10)).unwrap())
        .unwrap();
    assert_eq!(invoice.items().len(), 2);
    assert_eq!(invoice.totals().net_total, dec!(600));
    assert_eq!(invoice.totals().vat_total, dec!(115));
    assert_eq!(invoice.totals().gross_total, dec!(715));
}

#[test]
fn zero_values_are_valid() {
    let item = LineItem::new("Free sample", dec!(0), dec!(0), dec!(0)).unwrap();
    assert_eq!(item.total(), dec!(0));
}

// --- Validation order ---

#[test]
fn negative_inputs_are_rejected() {
    for (q, p, r, field) in [
        (dec!(-1), dec!(1), dec!(0.21), "quantity"),
        (dec!(1), dec!(-1), dec!(0.21), "unit_price"),
        (dec!(1), dec!(1), dec!(-0.21), "vat_rate"),
    ] {
        let err = LineItem::new("X", q, p, r).unwrap_err();
        assert_eq!(err.field, field);
        assert_eq!(err.constraint, Constraint::NonNegative);
    }
}

#[test]
fn empty_description_is_reported_before_negative_numbers() {
    let err = LineItem::new("  ", dec!(-1), dec!(1), dec!(0)).unwrap_err();
    assert_eq!(err.field, "description");
    assert_eq!(err.constraint, Constraint::Required);
}

#[test]
fn address_is_checked_before_party_identity() {
    let mut record = record();
    record.issuer.party.name = String::new();
    record.issuer.party.address.zip_code = String::new();
    let err = first_error(record);
    assert_eq!(err.field, "issuer.address.zip_code");
    assert_eq!(err.constraint, Constraint::Required);
}

#[test]
fn parties_are_checked_before_items() {
    let mut record = record();
    record.client.tax_id = " ".into();
    record.items[0].description = String::new();
    let err = first_error(record);
    assert_eq!(err.field, "client.tax_id");
}

#[test]
fn items_are_checked_before_dates() {
    let mut record = record();
    record.items.push(LineItemRecord {
        description: "Bad".into(),
        quantity: dec!(-2),
        unit_price: dec!(1),
        vat_rate: dec!(0),
        vat_amount: dec!(0),
        total: dec!(0),
    });
    record.due_date = date(2024, 1, 1);
    let err = first_error(record);
    assert_eq!(err.field, "items[1].quantity");
    assert_eq!(err.constraint, Constraint::NonNegative);
}

#[test]
fn due_date_before_operation_date() {
    let mut record = record();
    record.operation_date = date(2024, 3, 10);
    record.due_date = date(2024, 3, 5);
    let err = first_error(record);
    assert_eq!(err.field, "due_date");
    assert_eq!(err.constraint, Constraint::DateOrder);
}

#[test]
fn operation_date_before_emission_date() {
    let mut record = record();
    record.operation_date = date(2024, 2, 1);
    let err = first_error(record);
    assert_eq!(err.field, "operation_date");
    assert_eq!(err.constraint, Constraint::DateOrder);
}

#[test]
fn dates_are_checked_before_item_count() {
    let mut record = record();
    record.items.clear();
    record.operation_date = date(2024, 2, 1);
    assert_eq!(first_error(record).constraint, Constraint::DateOrder);
}

#[test]
fn empty_item_sequence_is_rejected() {
    let mut record = record();
    record.items.clear();
    let err = first_error(record);
    assert_eq!(err.field, "items");
    assert_eq!(err.constraint, Constraint::NonEmpty);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let mut record = record();
    record.schema_version = 2;
    assert_eq!(first_error(record).constraint, Constraint::SchemaVersion);
}

#[test]
fn builder_reports_missing_parties() {
    let err = InvoiceBuilder::new("F-1", date(2024, 3, 1))
        .client(client())
        .add_item(consulting())
        .build()
        .unwrap_err();
    assert_eq!(err.field, "issuer");
    assert_eq!(err.constraint, Constraint::Required);
}

#[test]
fn builder_defaults_dates_to_emission() {
    let invoice = InvoiceBuilder::new("F-1", date(2024, 3, 1))
        .issuer(issuer())
        .client(client())
        .add_item(consulting())
        .build()
        .unwrap();
    assert_eq!(invoice.operation_date(), date(2024, 3, 1));
    assert_eq!(invoice.due_date(), date(2024, 3, 1));
}

#[test]
fn blank_free_text_is_dropped() {
    let invoice = InvoiceBuilder::new("F-1", date(2024, 3, 1))
        .issuer(issuer())
        .client(client())
        .add_item(consulting())
        .notes("   ")
        .reference("PO-77")
        .build()
        .unwrap();
    assert_eq!(invoice.notes(), None);
    assert_eq!(invoice.reference(), Some("PO-77"));
}

#[test]
fn validation_error_display() {
    let err = ValidationError::new("client.name", Constraint::Required, "name is mandatory");
    assert_eq!(err.to_string(), "[required] client.name: name is mandatory");
    let wrapped = InvoiceError::from(err);
    assert!(wrapped.to_string().starts_with("validation failed: [required]"));
}

// --- Address formatting ---

#[test]
fn address_example_has_three_lines() {
    assert_eq!(format_address(&address()), ["Main 12", "08001 Barcelona", "Spain"]);
}

#[test]
fn address_optional_parts() {
    let full = AddressBuilder::new("Main", "12", "08001", "Barcelona", "Spain")
        .stairs("Esc. B")
        .door("2a")
        .state("Catalonia")
        .build()
        .unwrap();
    insta::assert_debug_snapshot!(format_address(&full), @r###"
    [
        "Main 12, Esc. B, 2a",
        "08001 Barcelona, Catalonia",
        "Spain",
    ]
    "###);
    assert_eq!(format_address(&full), format_address(&full.clone()));
}

// --- Display formatting ---

#[test]
fn display_rounding_is_half_away_from_zero() {
    assert_eq!(money::format_amount(dec!(2.345), "EUR"), "2.35 EUR");
    assert_eq!(money::format_amount(dec!(-2.345), ""), "-2.35");
    assert_eq!(money::format_amount(dec!(605), "EUR"), "605.00 EUR");
    assert_eq!(money::format_unit_price(dec!(50), "EUR"), "50.000 EUR");
    assert_eq!(money::format_quantity(dec!(1.005)), "1.01");
    assert_eq!(money::format_rate(dec!(0.21)), "21%");
    assert_eq!(money::format_rate(dec!(0.055)), "5.5%");
}

#[test]
fn date_formatting_falls_back_on_bad_pattern() {
    assert_eq!(money::format_date(date(2024, 3, 9), "%d/%m/%Y"), "09/03/2024");
    assert_eq!(money::format_date(date(2024, 3, 9), "%Q"), "2024-03-09");
}
