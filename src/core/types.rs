use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calc::{self, LineAmounts};
use super::error::ValidationError;
use super::validation;

/// Revision of the serialized invoice record understood by this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub street_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stairs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door: Option<String>,
    pub zip_code: String,
    pub city: String,
    /// State, province or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
}

/// A party named on the invoice: the billed client, or the identity part of
/// the issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub address: Address,
    /// Tax identifier (NIF, VAT number or equivalent).
    pub tax_id: String,
}

/// The billed party.
pub type Client = Party;

/// The issuing party: a [`Party`] plus the contact and bank details printed
/// for payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    #[serde(flatten)]
    pub party: Party,
    /// Bank account (IBAN) payments are made to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One invoice line.
///
/// Only the inputs are stored. VAT amount and line total are recomputed from
/// them on every access, so they cannot drift from quantity, price or rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LineItemRecord", into = "LineItemRecord")]
pub struct LineItem {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    /// Fraction, e.g. `0.21` for 21 %.
    vat_rate: Decimal,
}

impl LineItem {
    /// Create a line item, rejecting an empty description and negative or
    /// out-of-range numbers.
    ///
    /// ```
    /// use pdf_invoicer::core::LineItem;
    /// use rust_decimal_macros::dec;
    ///
    /// let item = LineItem::new("Consulting", dec!(10), dec!(50.0), dec!(0.21)).unwrap();
    /// assert_eq!(item.vat_amount(), dec!(105));
    /// assert_eq!(item.total(), dec!(605));
    /// ```
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        vat_rate: Decimal,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        validation::validate_item_fields(&description, quantity, unit_price, vat_rate)?;
        Ok(Self {
            description,
            quantity,
            unit_price,
            vat_rate,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn vat_rate(&self) -> Decimal {
        self.vat_rate
    }

    /// Net, VAT and total for this line, unrounded.
    pub fn amounts(&self) -> LineAmounts {
        calc::line_amounts(self.quantity, self.unit_price, self.vat_rate)
    }

    /// `quantity * unit_price`.
    pub fn net_amount(&self) -> Decimal {
        self.amounts().net
    }

    /// `quantity * unit_price * vat_rate`.
    pub fn vat_amount(&self) -> Decimal {
        self.amounts().vat
    }

    /// `quantity * unit_price + vat_amount`.
    pub fn total(&self) -> Decimal {
        self.amounts().total
    }
}

/// Wire form of a [`LineItem`].
///
/// `vat_amount` and `total` are written for readers of the record; they are
/// never read back, so a deserialized item always recomputes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub vat_rate: Decimal,
    #[serde(default, skip_deserializing)]
    pub vat_amount: Decimal,
    #[serde(default, skip_deserializing)]
    pub total: Decimal,
}

impl From<LineItem> for LineItemRecord {
    fn from(item: LineItem) -> Self {
        let amounts = item.amounts();
        Self {
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            vat_rate: item.vat_rate,
            vat_amount: amounts.vat,
            total: amounts.total,
        }
    }
}

impl TryFrom<LineItemRecord> for LineItem {
    type Error = ValidationError;

    fn try_from(record: LineItemRecord) -> Result<Self, Self::Error> {
        LineItem::new(
            record.description,
            record.quantity,
            record.unit_price,
            record.vat_rate,
        )
    }
}

/// Invoice-level aggregates. Always derived from the item sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Σ quantity × unit price.
    pub net_total: Decimal,
    /// Σ line VAT amounts.
    pub vat_total: Decimal,
    /// net_total + vat_total.
    pub gross_total: Decimal,
}

/// A validated invoice.
///
/// Fields are private: the record is created through [`InvoiceBuilder`]
/// (or deserialized from an [`InvoiceRecord`]) and only grows through
/// [`Invoice::push_item`], which keeps [`Totals`] in step with the items.
///
/// [`InvoiceBuilder`]: super::InvoiceBuilder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InvoiceRecord", into = "InvoiceRecord")]
pub struct Invoice {
    number: String,
    emission_date: NaiveDate,
    operation_date: NaiveDate,
    due_date: NaiveDate,
    issuer: Issuer,
    client: Client,
    items: Vec<LineItem>,
    totals: Totals,
    payment_method: Option<String>,
    notes: Option<String>,
    reference: Option<String>,
    paid: bool,
}

impl Invoice {
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn emission_date(&self) -> NaiveDate {
        self.emission_date
    }

    pub fn operation_date(&self) -> NaiveDate {
        self.operation_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn issuer(&self) -> &Issuer {
        &self.issuer
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn is_paid(&self) -> bool {
        self.paid
    }

    /// Append an item and recompute the totals.
    pub fn push_item(&mut self, item: LineItem) -> Result<(), ValidationError> {
        validation::check_item_capacity(self.items.len() + 1)?;
        self.items.push(item);
        self.totals = calc::aggregate(&self.items);
        Ok(())
    }
}

/// Wire form of an [`Invoice`] (schema revision [`SCHEMA_VERSION`]).
///
/// Dates are ISO-8601 calendar dates (`2024-06-15`). `totals` and the
/// per-item derived amounts are written on export and ignored on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub schema_version: u32,
    pub number: String,
    pub emission_date: NaiveDate,
    pub operation_date: NaiveDate,
    pub due_date: NaiveDate,
    pub issuer: Issuer,
    pub client: Client,
    pub items: Vec<LineItemRecord>,
    #[serde(default, skip_deserializing)]
    pub totals: Totals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default)]
    pub paid: bool,
}

impl From<Invoice> for InvoiceRecord {
    fn from(invoice: Invoice) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            number: invoice.number,
            emission_date: invoice.emission_date,
            operation_date: invoice.operation_date,
            due_date: invoice.due_date,
            issuer: invoice.issuer,
            client: invoice.client,
            items: invoice.items.into_iter().map(LineItemRecord::from).collect(),
            totals: invoice.totals,
            payment_method: invoice.payment_method,
            notes: invoice.notes,
            reference: invoice.reference,
            paid: invoice.paid,
        }
    }
}

impl TryFrom<InvoiceRecord> for Invoice {
    type Error = ValidationError;

    fn try_from(record: InvoiceRecord) -> Result<Self, Self::Error> {
        validation::validate_record(&record)?;

        let items = record
            .items
            .into_iter()
            .map(LineItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let totals = calc::aggregate(&items);

        Ok(Self {
            number: record.number,
            emission_date: record.emission_date,
            operation_date: record.operation_date,
            due_date: record.due_date,
            issuer: record.issuer,
            client: record.client,
            items,
            totals,
            payment_method: non_blank(record.payment_method),
            notes: non_blank(record.notes),
            reference: non_blank(record.reference),
            paid: record.paid,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
