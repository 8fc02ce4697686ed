//! Invoice collection and invoice-number sequence.

use std::sync::{Arc, PoisonError, RwLock};

use billbook_core::entity::{find_by_id, find_by_id_mut};
use billbook_core::{DomainError, DomainResult, Entity, InvoiceId};

use crate::invoice::Invoice;

/// Canonical store of invoices for the life of the process.
pub trait InvoiceStore: Send + Sync {
    /// Append `invoice`, assigning it the next sequence number, and return the stored record.
    fn create(&self, invoice: Invoice) -> DomainResult<Invoice>;

    /// Replace the record with the same id. The stored invoice number is kept.
    ///
    /// Returns `DomainError::NotFound` (and changes nothing) if no such record exists.
    fn update(&self, invoice: Invoice) -> DomainResult<Invoice>;

    fn get(&self, id: &InvoiceId) -> Option<Invoice>;

    /// Number the next `create` will assign. Does not advance the sequence.
    fn peek_next_number(&self) -> u64;

    /// Snapshot of all invoices in insertion order.
    fn list(&self) -> Vec<Invoice>;
}

impl<S> InvoiceStore for Arc<S>
where
    S: InvoiceStore + ?Sized,
{
    fn create(&self, invoice: Invoice) -> DomainResult<Invoice> {
        (**self).create(invoice)
    }

    fn update(&self, invoice: Invoice) -> DomainResult<Invoice> {
        (**self).update(invoice)
    }

    fn get(&self, id: &InvoiceId) -> Option<Invoice> {
        (**self).get(id)
    }

    fn peek_next_number(&self) -> u64 {
        (**self).peek_next_number()
    }

    fn list(&self) -> Vec<Invoice> {
        (**self).list()
    }
}

#[derive(Debug)]
struct Records {
    invoices: Vec<Invoice>,
    next_number: u64,
}

/// In-memory invoice store.
///
/// Collection and counter share one lock, so number assignment on create is a
/// single read-modify-write. None of the critical sections can panic half-way,
/// so a poisoned lock still holds consistent state and is recovered.
#[derive(Debug)]
pub struct InMemoryInvoiceStore {
    inner: RwLock<Records>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::with_first_number(1)
    }

    pub fn with_first_number(first_number: u64) -> Self {
        Self {
            inner: RwLock::new(Records {
                invoices: Vec::new(),
                next_number: first_number,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryInvoiceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceStore for InMemoryInvoiceStore {
    fn create(&self, invoice: Invoice) -> DomainResult<Invoice> {
        let mut records = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if find_by_id(&records.invoices, invoice.id()).is_some() {
            return Err(DomainError::conflict(format!(
                "invoice {} already exists",
                invoice.id()
            )));
        }

        let number = records.next_number;
        let following = number
            .checked_add(1)
            .ok_or_else(|| DomainError::invariant("invoice number sequence exhausted"))?;

        let stored = invoice.with_invoice_number(number);
        records.invoices.push(stored.clone());
        records.next_number = following;

        tracing::debug!(invoice_id = %stored.id(), invoice_number = number, "invoice appended");
        Ok(stored)
    }

    fn update(&self, invoice: Invoice) -> DomainResult<Invoice> {
        let mut records = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let Some(slot) = find_by_id_mut(&mut records.invoices, invoice.id()) else {
            return Err(DomainError::not_found());
        };

        let stored = invoice.with_invoice_number(slot.invoice_number());
        *slot = stored.clone();

        tracing::debug!(invoice_id = %stored.id(), "invoice replaced");
        Ok(stored)
    }

    fn get(&self, id: &InvoiceId) -> Option<Invoice> {
        let records = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        find_by_id(&records.invoices, id).cloned()
    }

    fn peek_next_number(&self) -> u64 {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).next_number
    }

    fn list(&self) -> Vec<Invoice> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).invoices.clone()
    }
}
