use chrono::NaiveDate;

use super::error::{Constraint, ValidationError};
use super::types::*;
use super::validation;

/// Builder for constructing valid invoices.
///
/// ```
/// use pdf_invoicer::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let address = AddressBuilder::new("Main", "12", "08001", "Barcelona", "Spain")
///     .build()
///     .unwrap();
/// let invoice = InvoiceBuilder::new("2024-001", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
///     .due_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
///     .issuer(IssuerBuilder::new("Issuer SL", address.clone(), "B12345678").build().unwrap())
///     .client(PartyBuilder::new("Client SA", address, "A87654321").build().unwrap())
///     .add_item(LineItem::new("Consulting", dec!(10), dec!(50), dec!(0.21)).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(invoice.totals().gross_total, dec!(605));
/// ```
pub struct InvoiceBuilder {
    number: String,
    emission_date: NaiveDate,
    operation_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    issuer: Option<Issuer>,
    client: Option<Client>,
    items: Vec<LineItem>,
    payment_method: Option<String>,
    notes: Option<String>,
    reference: Option<String>,
    paid: bool,
}

impl InvoiceBuilder {
    pub fn new(number: impl Into<String>, emission_date: NaiveDate) -> Self {
        Self {
            number: number.into(),
            emission_date,
            operation_date: None,
            due_date: None,
            issuer: None,
            client: None,
            items: Vec::new(),
            payment_method: None,
            notes: None,
            reference: None,
            paid: false,
        }
    }

    /// Date the goods or services were supplied. Defaults to the emission
    /// date.
    pub fn operation_date(mut self, date: NaiveDate) -> Self {
        self.operation_date = Some(date);
        self
    }

    /// Payment due date. Defaults to the operation date.
    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = LineItem>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    /// Run the validation gate and build the invoice with its totals.
    /// Returns the first violated constraint.
    pub fn build(self) -> Result<Invoice, ValidationError> {
        let issuer = self
            .issuer
            .ok_or_else(|| missing("issuer", "issuer is mandatory"))?;
        let client = self
            .client
            .ok_or_else(|| missing("client", "client is mandatory"))?;
        let operation_date = self.operation_date.unwrap_or(self.emission_date);
        let due_date = self.due_date.unwrap_or(operation_date);

        let record = InvoiceRecord {
            schema_version: SCHEMA_VERSION,
            number: self.number,
            emission_date: self.emission_date,
            operation_date,
            due_date,
            issuer,
            client,
            items: self.items.into_iter().map(LineItemRecord::from).collect(),
            totals: Totals::default(),
            payment_method: self.payment_method,
            notes: self.notes,
            reference: self.reference,
            paid: self.paid,
        };

        Invoice::try_from(record)
    }
}

fn missing(field: &str, message: &str) -> ValidationError {
    ValidationError::new(field, Constraint::Required, message)
}

/// Builder for the client party (and the identity part of an issuer).
pub struct PartyBuilder {
    name: String,
    address: Address,
    tax_id: String,
}

impl PartyBuilder {
    pub fn new(name: impl Into<String>, address: Address, tax_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address,
            tax_id: tax_id.into(),
        }
    }

    pub fn build(self) -> Result<Party, ValidationError> {
        let party = Party {
            name: self.name,
            address: self.address,
            tax_id: self.tax_id,
        };
        validation::validate_party(&party)?;
        Ok(party)
    }
}

/// Builder for the issuing party.
pub struct IssuerBuilder {
    party: PartyBuilder,
    iban: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl IssuerBuilder {
    pub fn new(name: impl Into<String>, address: Address, tax_id: impl Into<String>) -> Self {
        Self {
            party: PartyBuilder::new(name, address, tax_id),
            iban: None,
            email: None,
            phone: None,
        }
    }

    pub fn iban(mut self, iban: impl Into<String>) -> Self {
        self.iban = Some(iban.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn build(self) -> Result<Issuer, ValidationError> {
        Ok(Issuer {
            party: self.party.build()?,
            iban: self.iban,
            email: self.email,
            phone: self.phone,
        })
    }
}

/// Builder for Address.
pub struct AddressBuilder {
    street: String,
    street_number: String,
    stairs: Option<String>,
    floor: Option<String>,
    door: Option<String>,
    zip_code: String,
    city: String,
    state: Option<String>,
    country: String,
}

impl AddressBuilder {
    pub fn new(
        street: impl Into<String>,
        street_number: impl Into<String>,
        zip_code: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            street_number: street_number.into(),
            stairs: None,
            floor: None,
            door: None,
            zip_code: zip_code.into(),
            city: city.into(),
            state: None,
            country: country.into(),
        }
    }

    pub fn stairs(mut self, stairs: impl Into<String>) -> Self {
        self.stairs = Some(stairs.into());
        self
    }

    pub fn floor(mut self, floor: impl Into<String>) -> Self {
        self.floor = Some(floor.into());
        self
    }

    pub fn door(mut self, door: impl Into<String>) -> Self {
        self.door = Some(door.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn build(self) -> Result<Address, ValidationError> {
        let address = Address {
            street: self.street,
            street_number: self.street_number,
            stairs: self.stairs,
            floor: self.floor,
            door: self.door,
            zip_code: self.zip_code,
            city: self.city,
            state: self.state,
            country: self.country,
        };
        validation::validate_address(&address)?;
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn address() -> Address {
        AddressBuilder::new("Main", "12", "08001", "Barcelona", "Spain")
            .build()
            .unwrap()
    }

    fn builder() -> InvoiceBuilder {
        InvoiceBuilder::new("2024-001", date(2024, 6, 1))
            .issuer(IssuerBuilder::new("Issuer SL", address(), "B1").build().unwrap())
            .client(PartyBuilder::new("Client SA", address(), "A2").build().unwrap())
    }

    #[test]
    fn dates_default_to_emission() {
        let invoice = builder()
            .add_item(LineItem::new("Consulting", dec!(1), dec!(1), dec!(0)).unwrap())
            .build()
            .unwrap();
        assert_eq!(invoice.operation_date(), date(2024, 6, 1));
        assert_eq!(invoice.due_date(), date(2024, 6, 1));
    }

    #[test]
    fn missing_issuer() {
        let err = InvoiceBuilder::new("2024-001", date(2024, 6, 1))
            .build()
            .unwrap_err();
        assert_eq!(err.field, "issuer");
    }

    #[test]
    fn no_items() {
        let err = builder().build().unwrap_err();
        assert_eq!(err.constraint, Constraint::NonEmpty);
    }

    #[test]
    fn blank_free_text_is_dropped() {
        let invoice = builder()
            .add_item(LineItem::new("Consulting", dec!(1), dec!(1), dec!(0)).unwrap())
            .notes("   ")
            .reference("PO-7")
            .build()
            .unwrap();
        assert_eq!(invoice.notes(), None);
        assert_eq!(invoice.reference(), Some("PO-7"));
    }

    #[test]
    fn address_builder_validates() {
        let err = AddressBuilder::new("Main", "", "08001", "Barcelona", "Spain")
            .build()
            .unwrap_err();
        assert_eq!(err.field, "street_number");
    }

    #[test]
    fn push_item_recomputes_totals() {
        let mut invoice = builder()
            .add_item(LineItem::new("Consulting", dec!(10), dec!(50), dec!(0.21)).unwrap())
            .build()
            .unwrap();
        assert_eq!(invoice.totals().gross_total, dec!(605));

        invoice
            .push_item(LineItem::new("Travel", dec!(1), dec!(100), dec!(0.10)).unwrap())
            .unwrap();
        let totals = invoice.totals();
        assert_eq!(totals.net_total, dec!(600));
        assert_eq!(totals.vat_total, dec!(115));
        assert_eq!(totals.gross_total, dec!(715));
    }
}
