//! End-to-end flow over the service and the in-memory store.
//!
//! Exercises the full lifecycle of one sale: issue a batch, inspect the
//! report, activate one ticket, inspect the report again.

#![allow(clippy::expect_used)] // Test code uses expect for clear failure messages

use bilheteria_core::{MemoryTicketStore, SaleRequest, TicketService, TicketStatus};
use std::sync::Arc;

#[tokio::test]
async fn sale_activation_and_report_flow() {
    let store = Arc::new(MemoryTicketStore::new());
    let service = TicketService::new(store, "segredo".to_string(), 30.0)
        .expect("valid service settings");

    // Ana buys two tickets from Bia, paid via pix.
    let codes = service
        .issue_batch(SaleRequest {
            buyer: "Ana".to_string(),
            seller: "Bia".to_string(),
            quantity: 2,
            payment_methods: vec!["pix".to_string()],
            amount_received: 60.0,
        })
        .await
        .expect("issuance succeeds");
    assert_eq!(codes.len(), 2);
    assert_ne!(codes[0], codes[1]);

    // Immediately after issuance: two sold, none activated.
    let report = service.report("segredo").await.expect("report succeeds");
    assert_eq!(report.total_sold, 2);
    assert_eq!(report.total_activated, 0);
    assert!((report.total_value - 60.0).abs() < f64::EPSILON);
    assert_eq!(report.by_payment_method.get("pix"), Some(&2));
    assert_eq!(report.by_seller.get("Bia"), Some(&2));
    assert_eq!(report.by_buyer.get("Ana"), Some(&2));

    // Carlos activates the first ticket at the door.
    let activated = service
        .activate(codes[0].clone(), "Carlos".to_string())
        .await
        .expect("activation succeeds");
    assert_eq!(activated.status, TicketStatus::Released);
    assert_eq!(activated.activated_by, "Carlos");

    // The report reflects the activation; nothing else changed.
    let report = service.report("segredo").await.expect("report succeeds");
    assert_eq!(report.total_sold, 2);
    assert_eq!(report.total_activated, 1);
}

#[tokio::test]
async fn payment_method_labels_survive_delimiter_characters() {
    let store = Arc::new(MemoryTicketStore::new());
    let service = TicketService::new(store, "segredo".to_string(), 30.0)
        .expect("valid service settings");

    // A label containing '+' must stay one label, not split into two.
    service
        .issue_batch(SaleRequest {
            buyer: "Ana".to_string(),
            seller: "Bia".to_string(),
            quantity: 1,
            payment_methods: vec!["pix+cartao".to_string()],
            amount_received: 30.0,
        })
        .await
        .expect("issuance succeeds");

    let report = service.report("segredo").await.expect("report succeeds");
    assert_eq!(report.by_payment_method.get("pix+cartao"), Some(&1));
    assert_eq!(report.by_payment_method.get("pix"), None);
    assert_eq!(report.by_payment_method.get("cartao"), None);
}
