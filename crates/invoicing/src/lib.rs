//! Invoicing domain module.
//!
//! Drafts, validation rules, totals and the in-memory invoice store, implemented
//! as deterministic domain logic (no IO, no rendering, no persistence).

pub mod config;
pub mod invoice;
pub mod service;
pub mod store;
pub mod validation;

pub use config::InvoicingConfig;
pub use invoice::{BillSundry, Invoice, InvoiceDraft, InvoiceSummary, LineItem};
pub use service::{InvoiceService, SubmitError, SubmitMode};
pub use store::{InMemoryInvoiceStore, InvoiceStore};
pub use validation::{ValidatedDraft, ValidationError, compute_total, validate};
