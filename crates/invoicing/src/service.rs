//! Entry points used by the presentation layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use billbook_core::{Clock, DomainError, DomainResult, InvoiceId, SystemClock};

use crate::config::InvoicingConfig;
use crate::invoice::{Invoice, InvoiceDraft, InvoiceSummary};
use crate::store::{InMemoryInvoiceStore, InvoiceStore};
use crate::validation::{ValidationError, validate};

/// Whether a submitted draft is a new invoice or an edit of a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    Create,
    Edit,
}

impl SubmitMode {
    pub fn from_is_edit(is_edit: bool) -> Self {
        if is_edit { Self::Edit } else { Self::Create }
    }
}

/// Why a submission was not persisted. The draft is left untouched either way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Invoice workflows over an injected store and clock.
#[derive(Debug)]
pub struct InvoiceService<S, C> {
    store: S,
    clock: C,
}

impl InvoiceService<InMemoryInvoiceStore, SystemClock> {
    /// In-memory service on the system clock, numbering from the configured start.
    pub fn from_config(config: &InvoicingConfig) -> Self {
        Self::new(
            InMemoryInvoiceStore::with_first_number(config.first_invoice_number),
            SystemClock,
        )
    }
}

impl<S, C> InvoiceService<S, C>
where
    S: InvoiceStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list_invoices(&self) -> Vec<Invoice> {
        self.store.list()
    }

    pub fn summaries(&self) -> Vec<InvoiceSummary> {
        self.store.list().iter().map(InvoiceSummary::from).collect()
    }

    pub fn get_invoice(&self, id: &InvoiceId) -> DomainResult<Invoice> {
        self.store.get(id).ok_or_else(DomainError::not_found)
    }

    pub fn next_invoice_number(&self) -> u64 {
        self.store.peek_next_number()
    }

    /// Blank draft carrying the provisional next invoice number.
    pub fn new_draft(&self) -> InvoiceDraft {
        InvoiceDraft::new(self.store.peek_next_number())
    }

    /// Load a stored invoice back into an editable draft.
    ///
    /// On `NotFound` the caller tells the user and falls back to [`Self::new_draft`].
    pub fn edit_draft(&self, id: &InvoiceId) -> DomainResult<InvoiceDraft> {
        match self.store.get(id) {
            Some(invoice) => Ok(InvoiceDraft::from(&invoice)),
            None => {
                tracing::warn!(invoice_id = %id, "invoice not found for edit");
                Err(DomainError::not_found())
            }
        }
    }

    /// Validate `draft`, compute its total and persist it.
    pub fn submit_invoice(
        &self,
        draft: &InvoiceDraft,
        mode: SubmitMode,
    ) -> Result<Invoice, SubmitError> {
        let validated = match validate(draft, self.clock.today()) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(invoice_id = %draft.id, ?mode, "invoice rejected: {}", err);
                return Err(err.into());
            }
        };

        let invoice = Invoice::from_validated(&validated);
        let stored = match mode {
            SubmitMode::Create => self.store.create(invoice)?,
            SubmitMode::Edit => self.store.update(invoice).inspect_err(|err| {
                tracing::warn!(invoice_id = %draft.id, "invoice update failed: {}", err);
            })?,
        };

        tracing::info!(
            invoice_id = %stored.id_typed(),
            invoice_number = stored.invoice_number(),
            total = %stored.total_amount(),
            ?mode,
            "invoice saved"
        );
        Ok(stored)
    }
}
