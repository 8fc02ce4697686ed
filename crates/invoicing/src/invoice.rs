use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use billbook_core::entity::{find_by_id_mut, remove_by_id};
use billbook_core::{DomainError, DomainResult, Entity, InvoiceId, LineItemId, SundryId};

use crate::validation::{ValidatedDraft, compute_total};

/// A priced line on an invoice.
///
/// Only the independent inputs are stored; [`LineItem::amount`] is always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            id: LineItemId::new(),
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Empty row as offered by the entry form: quantity 1, price 0.
    pub fn blank() -> Self {
        Self::new(String::new(), Decimal::ONE, Decimal::ZERO)
    }

    /// `quantity * unit_price`; fails rather than round or clamp on overflow.
    pub fn amount(&self) -> DomainResult<Decimal> {
        self.quantity
            .checked_mul(self.unit_price)
            .ok_or_else(|| DomainError::invariant("invoice line amount overflow"))
    }
}

impl Entity for LineItem {
    type Id = LineItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Ancillary charge (positive amount) or deduction (negative amount).
///
/// `amount` deserializes from a JSON number or a numeric string; an empty
/// (or whitespace-only) string is an untouched field and reads as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSundry {
    pub id: SundryId,
    pub name: String,
    #[serde(deserialize_with = "deserialize_sundry_amount")]
    pub amount: Decimal,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(Decimal),
    Text(String),
}

fn deserialize_sundry_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(amount) => Ok(amount),
        RawAmount::Text(raw) if raw.trim().is_empty() => Ok(Decimal::ZERO),
        RawAmount::Text(raw) => Err(serde::de::Error::custom(format!(
            "sundry amount must be numeric, got {raw:?}"
        ))),
    }
}

impl BillSundry {
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: SundryId::new(),
            name: name.into(),
            amount,
        }
    }

    pub fn blank() -> Self {
        Self::new(String::new(), Decimal::ZERO)
    }
}

impl Entity for BillSundry {
    type Id = SundryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// In-progress invoice under edit. Nothing here is trusted until validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub id: InvoiceId,
    /// `None` while the date field is empty.
    pub date: Option<NaiveDate>,
    /// Provisional number shown on the form; the store assigns the real one on create.
    pub invoice_number: u64,
    pub customer_name: String,
    pub billing_address: String,
    pub shipping_address: String,
    /// Tax registration identifier (GSTIN).
    pub tax_id: String,
    pub items: Vec<LineItem>,
    pub sundries: Vec<BillSundry>,
}

impl InvoiceDraft {
    /// Fresh draft with a generated id, one blank item and one blank sundry.
    pub fn new(invoice_number: u64) -> Self {
        Self {
            id: InvoiceId::new(),
            date: None,
            invoice_number,
            customer_name: String::new(),
            billing_address: String::new(),
            shipping_address: String::new(),
            tax_id: String::new(),
            items: vec![LineItem::blank()],
            sundries: vec![BillSundry::blank()],
        }
    }

    /// Append a blank item and return its id.
    pub fn add_item(&mut self) -> LineItemId {
        let item = LineItem::blank();
        let id = item.id;
        self.items.push(item);
        id
    }

    pub fn remove_item(&mut self, id: &LineItemId) -> bool {
        remove_by_id(&mut self.items, id)
    }

    pub fn item_mut(&mut self, id: &LineItemId) -> Option<&mut LineItem> {
        find_by_id_mut(&mut self.items, id)
    }

    /// Append a blank sundry and return its id.
    pub fn add_sundry(&mut self) -> SundryId {
        let sundry = BillSundry::blank();
        let id = sundry.id;
        self.sundries.push(sundry);
        id
    }

    pub fn remove_sundry(&mut self, id: &SundryId) -> bool {
        remove_by_id(&mut self.sundries, id)
    }

    pub fn sundry_mut(&mut self, id: &SundryId) -> Option<&mut BillSundry> {
        find_by_id_mut(&mut self.sundries, id)
    }

    /// Running total for display while editing. Not persisted.
    pub fn total_preview(&self) -> DomainResult<Decimal> {
        compute_total(self)
    }
}

impl From<&Invoice> for InvoiceDraft {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            date: Some(invoice.date),
            invoice_number: invoice.invoice_number,
            customer_name: invoice.customer_name.clone(),
            billing_address: invoice.billing_address.clone(),
            shipping_address: invoice.shipping_address.clone(),
            tax_id: invoice.tax_id.clone(),
            items: invoice.items.clone(),
            sundries: invoice.sundries.clone(),
        }
    }
}

/// Aggregate root: a persisted invoice.
///
/// Only constructible from a [`ValidatedDraft`], so a stored invoice always
/// satisfies the validation rules and carries a freshly computed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    id: InvoiceId,
    date: NaiveDate,
    invoice_number: u64,
    customer_name: String,
    billing_address: String,
    shipping_address: String,
    tax_id: String,
    items: Vec<LineItem>,
    sundries: Vec<BillSundry>,
    total_amount: Decimal,
}

impl Invoice {
    pub fn from_validated(validated: &ValidatedDraft<'_>) -> Self {
        let draft = validated.draft();
        Self {
            id: draft.id,
            date: validated.date(),
            invoice_number: draft.invoice_number,
            customer_name: draft.customer_name.clone(),
            billing_address: draft.billing_address.clone(),
            shipping_address: draft.shipping_address.clone(),
            tax_id: draft.tax_id.clone(),
            items: draft.items.clone(),
            sundries: draft.sundries.clone(),
            total_amount: validated.total(),
        }
    }

    /// Stamp the store-assigned sequence number.
    ///
    /// Store implementations call this on create, and to carry the stored
    /// number forward on update.
    pub fn with_invoice_number(mut self, invoice_number: u64) -> Self {
        self.invoice_number = invoice_number;
        self
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn invoice_number(&self) -> u64 {
        self.invoice_number
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn billing_address(&self) -> &str {
        &self.billing_address
    }

    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn sundries(&self) -> &[BillSundry] {
        &self.sundries
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn summary(&self) -> InvoiceSummary {
        InvoiceSummary::from(self)
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Row shown by the invoice list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub id: InvoiceId,
    pub invoice_number: u64,
    pub customer_name: String,
    pub billing_address: String,
    pub shipping_address: String,
    pub tax_id: String,
    pub total_amount: Decimal,
}

impl From<&Invoice> for InvoiceSummary {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            customer_name: invoice.customer_name.clone(),
            billing_address: invoice.billing_address.clone(),
            shipping_address: invoice.shipping_address.clone(),
            tax_id: invoice.tax_id.clone(),
            total_amount: invoice.total_amount,
        }
    }
}
