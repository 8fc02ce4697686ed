use std::sync::Arc;

use billbook_core::{DomainError, FixedClock};
use billbook_invoicing::{
    InMemoryInvoiceStore, InvoiceDraft, InvoiceService, InvoiceStore, InvoicingConfig, LineItem,
    SubmitError, SubmitMode, ValidationError, compute_total,
};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2031, 2, 10).unwrap()
}

fn service_with(store: Arc<InMemoryInvoiceStore>) -> InvoiceService<Arc<InMemoryInvoiceStore>, FixedClock> {
    billbook_observability::init();
    InvoiceService::new(store, FixedClock::on(today()))
}

/// Mimics a user filling in the entry form field by field.
fn fill_form(draft: &mut InvoiceDraft, customer: &str) {
    draft.date = Some(today());
    draft.customer_name = customer.to_string();
    draft.billing_address = "14 Lake View".to_string();
    draft.shipping_address = "Warehouse 3, Dock Rd".to_string();
    draft.tax_id = "24AAACC1206D1ZM".to_string();

    let first = draft.items[0].id;
    let row = draft.item_mut(&first).unwrap();
    row.name = "Steel rod".to_string();
    row.quantity = dec!(40);
    row.unit_price = dec!(2.50);

    let second = draft.add_item();
    let row = draft.item_mut(&second).unwrap();
    row.name = "Bracket".to_string();
    row.quantity = dec!(10);
    row.unit_price = dec!(3);

    let sundry = draft.sundries[0].id;
    let charge = draft.sundry_mut(&sundry).unwrap();
    charge.name = "Discount".to_string();
    charge.amount = dec!(-10);
}

#[test]
fn create_list_edit_flow() {
    let store = Arc::new(InMemoryInvoiceStore::new());
    let service = service_with(Arc::clone(&store));

    // Empty list view.
    assert!(service.summaries().is_empty());

    // Create view: blank rows are invalid until filled in.
    let mut draft = service.new_draft();
    draft.date = Some(today());
    draft.customer_name = "Contoso".to_string();
    draft.billing_address = "x".to_string();
    draft.shipping_address = "y".to_string();
    draft.tax_id = "z".to_string();
    assert_eq!(
        service.submit_invoice(&draft, SubmitMode::Create).unwrap_err(),
        SubmitError::Invalid(ValidationError::InvalidItem { index: 0 })
    );

    fill_form(&mut draft, "Contoso");
    let expected_total = dec!(100) + dec!(30) - dec!(10);
    assert_eq!(draft.total_preview(), Ok(expected_total));

    let created = service
        .submit_invoice(&draft, SubmitMode::from_is_edit(false))
        .unwrap();
    assert_eq!(created.invoice_number(), 1);
    assert_eq!(created.total_amount(), expected_total);
    assert_eq!(Ok(created.total_amount()), compute_total(&draft));

    // List view reads the same store the service writes.
    assert_eq!(store.list(), vec![created.clone()]);
    let rows = service.summaries();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].customer_name, "Contoso");
    assert_eq!(rows[0].total_amount, expected_total);

    // Edit view: drop the discount, resubmit.
    let mut edit = service.edit_draft(&created.id_typed()).unwrap();
    let discount = edit.sundries[0].id;
    assert!(edit.remove_sundry(&discount));
    let updated = service
        .submit_invoice(&edit, SubmitMode::from_is_edit(true))
        .unwrap();
    assert_eq!(updated.total_amount(), dec!(130));
    assert_eq!(updated.invoice_number(), 1);
    assert_eq!(service.get_invoice(&created.id_typed()).unwrap(), updated);
    assert_eq!(service.next_invoice_number(), 2);
}

#[test]
fn missing_invoice_on_edit_falls_back_to_create() {
    let service = service_with(Arc::new(InMemoryInvoiceStore::new()));
    let unknown = InvoiceDraft::new(1).id;

    let draft = match service.edit_draft(&unknown) {
        Ok(draft) => draft,
        Err(DomainError::NotFound) => service.new_draft(),
        Err(other) => panic!("unexpected error: {other:?}"),
    };
    assert_ne!(draft.id, unknown);
    assert_eq!(draft.invoice_number, 1);
}

#[test]
fn two_sequential_creates_are_numbered_from_config() {
    let config = InvoicingConfig::from_json(r#"{"first_invoice_number": 1}"#).unwrap();
    let store = Arc::new(InMemoryInvoiceStore::with_first_number(config.first_invoice_number));
    let service = service_with(store);

    let mut numbers = Vec::new();
    for customer in ["North", "South"] {
        let mut draft = service.new_draft();
        fill_form(&mut draft, customer);
        numbers.push(service.submit_invoice(&draft, SubmitMode::Create).unwrap().invoice_number());
    }
    assert_eq!(numbers, vec![1, 2]);
}

#[test]
fn widget_scenario_end_to_end() {
    let service = service_with(Arc::new(InMemoryInvoiceStore::new()));
    let mut draft = service.new_draft();
    draft.date = today().succ_opt();
    draft.customer_name = "Widget Co".to_string();
    draft.billing_address = "1 A St".to_string();
    draft.shipping_address = "1 A St".to_string();
    draft.tax_id = "GST1".to_string();
    draft.items = vec![LineItem::new("Widget", dec!(2), dec!(5))];
    draft.sundries.clear();

    let saved = service.submit_invoice(&draft, SubmitMode::Create).unwrap();
    assert_eq!(saved.total_amount(), dec!(10));
}
