//! Invoice validation rules and total computation.
//!
//! Everything here is a pure function of the draft (and the caller-supplied
//! "today"); nothing touches the store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use billbook_core::{DomainError, DomainResult};

use crate::invoice::{InvoiceDraft, LineItem};

/// Closed set of draft validation failures.
///
/// Messages are the ones shown to the user verbatim.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Date is required.")]
    MissingDate,

    #[error("Backdate entry is not allowed.")]
    BackdatedInvoice,

    #[error("Customer name is required.")]
    MissingCustomerName,

    #[error("Billing address is required.")]
    MissingBillingAddress,

    #[error("Shipping address is required.")]
    MissingShippingAddress,

    #[error("GSTIN is required.")]
    MissingTaxId,

    #[error("At least one item is required.")]
    NoItems,

    /// First item (by position) with an empty name or a non-positive quantity/price.
    #[error("Invalid items in the invoice.")]
    InvalidItem { index: usize },

    /// A line amount or the invoice total does not fit the decimal range.
    #[error("Invoice amount is too large.")]
    AmountOverflow,
}

/// Proof that a draft passed [`validate`]. Borrows the draft unchanged.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedDraft<'a> {
    draft: &'a InvoiceDraft,
    date: NaiveDate,
    total: Decimal,
}

impl<'a> ValidatedDraft<'a> {
    pub fn draft(&self) -> &'a InvoiceDraft {
        self.draft
    }

    /// The (present, non-backdated) invoice date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Exact total, computed once during validation.
    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Check `draft` against the business rules, reporting the first failure.
///
/// Rules run in a fixed order so the reported error is reproducible: date
/// present, date not before `today`, customer name, billing address,
/// shipping address, tax id, at least one item, every item well-formed, and
/// finally the total fits the decimal range.
pub fn validate(draft: &InvoiceDraft, today: NaiveDate) -> Result<ValidatedDraft<'_>, ValidationError> {
    let date = draft.date.ok_or(ValidationError::MissingDate)?;
    if date < today {
        return Err(ValidationError::BackdatedInvoice);
    }

    if draft.customer_name.is_empty() {
        return Err(ValidationError::MissingCustomerName);
    }
    if draft.billing_address.is_empty() {
        return Err(ValidationError::MissingBillingAddress);
    }
    if draft.shipping_address.is_empty() {
        return Err(ValidationError::MissingShippingAddress);
    }
    if draft.tax_id.is_empty() {
        return Err(ValidationError::MissingTaxId);
    }

    if draft.items.is_empty() {
        return Err(ValidationError::NoItems);
    }
    if let Some(index) = draft.items.iter().position(|item| !is_valid_item(item)) {
        return Err(ValidationError::InvalidItem { index });
    }

    let total = compute_total(draft).map_err(|_| ValidationError::AmountOverflow)?;

    Ok(ValidatedDraft { draft, date, total })
}

/// Sum of recomputed item amounts plus the sum of sundry amounts.
///
/// Item amounts are always recomputed from quantity and unit price. Overflow
/// anywhere is an error; the result is never clamped.
pub fn compute_total(draft: &InvoiceDraft) -> DomainResult<Decimal> {
    let mut total = Decimal::ZERO;
    for item in &draft.items {
        total = total
            .checked_add(item.amount()?)
            .ok_or_else(|| DomainError::invariant("invoice total overflow"))?;
    }
    for sundry in &draft.sundries {
        total = total
            .checked_add(sundry.amount)
            .ok_or_else(|| DomainError::invariant("invoice total overflow"))?;
    }
    Ok(total)
}

fn is_valid_item(item: &LineItem) -> bool {
    !item.name.is_empty() && item.quantity > Decimal::ZERO && item.unit_price > Decimal::ZERO
}
