//! In-memory ticket store for tests and local development.
//!
//! Backed by a `HashMap` behind a mutex. Atomicity of
//! [`compare_and_activate`](crate::store::TicketStore::compare_and_activate)
//! comes from holding the lock across the read-check-write sequence, which
//! mirrors the single-row atomicity the Postgres store gets from a
//! conditional `UPDATE`.

use crate::store::{StoreFuture, TicketStore, TicketStoreError};
use crate::ticket::{Ticket, TicketCode, TicketStatus};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory, mutex-guarded ticket store.
///
/// Not durable — contents are lost when the process exits. Intended for unit
/// and integration tests, where it removes the need for a database container.
#[derive(Debug, Default)]
pub struct MemoryTicketStore {
    tickets: Mutex<HashMap<String, Ticket>>,
}

impl MemoryTicketStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tickets<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, Ticket>) -> Result<T, TicketStoreError>,
    ) -> Result<T, TicketStoreError> {
        let mut tickets = self
            .tickets
            .lock()
            .map_err(|_| TicketStoreError::Storage("ticket map lock poisoned".to_string()))?;
        f(&mut tickets)
    }
}

impl TicketStore for MemoryTicketStore {
    fn insert(&self, ticket: Ticket) -> StoreFuture<'_, ()> {
        let result = self.with_tickets(|tickets| {
            if tickets.contains_key(ticket.code.as_str()) {
                return Err(TicketStoreError::DuplicateCode(ticket.code.clone()));
            }
            tickets.insert(ticket.code.as_str().to_string(), ticket);
            Ok(())
        });
        Box::pin(async move { result })
    }

    fn get_by_code(&self, code: TicketCode) -> StoreFuture<'_, Option<Ticket>> {
        let result = self.with_tickets(|tickets| Ok(tickets.get(code.as_str()).cloned()));
        Box::pin(async move { result })
    }

    fn compare_and_activate(
        &self,
        code: TicketCode,
        operator: String,
    ) -> StoreFuture<'_, Ticket> {
        let result = self.with_tickets(|tickets| {
            let Some(ticket) = tickets.get_mut(code.as_str()) else {
                return Err(TicketStoreError::NotFound(code.clone()));
            };
            if ticket.is_released() {
                return Err(TicketStoreError::AlreadyActivated(code.clone()));
            }
            ticket.status = TicketStatus::Released;
            ticket.activated_by = operator;
            Ok(ticket.clone())
        });
        Box::pin(async move { result })
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<Ticket>> {
        let result = self.with_tickets(|tickets| Ok(tickets.values().cloned().collect()));
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::panic)] // Test code uses expect/panic for clear failure messages

    use super::*;
    use chrono::Utc;

    fn ticket(code: &str) -> Ticket {
        Ticket {
            code: TicketCode::from(code),
            status: TicketStatus::AwaitingPayment,
            payment_methods: vec!["pix".to_string()],
            sold_at: Utc::now(),
            seller: "Bia".to_string(),
            activated_by: String::new(),
            buyer: "Ana".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_roundtrip() {
        let store = MemoryTicketStore::new();
        store.insert(ticket("abc")).await.expect("insert succeeds");

        let found = store
            .get_by_code(TicketCode::from("abc"))
            .await
            .expect("lookup succeeds");
        assert_eq!(found.map(|t| t.buyer), Some("Ana".to_string()));

        let missing = store
            .get_by_code(TicketCode::from("zzz"))
            .await
            .expect("lookup succeeds");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_code() {
        let store = MemoryTicketStore::new();
        store.insert(ticket("abc")).await.expect("insert succeeds");

        let err = store
            .insert(ticket("abc"))
            .await
            .expect_err("duplicate insert fails");
        assert_eq!(
            err,
            TicketStoreError::DuplicateCode(TicketCode::from("abc"))
        );
    }

    #[tokio::test]
    async fn activation_transitions_exactly_once() {
        let store = MemoryTicketStore::new();
        store.insert(ticket("abc")).await.expect("insert succeeds");

        let activated = store
            .compare_and_activate(TicketCode::from("abc"), "Carlos".to_string())
            .await
            .expect("activation succeeds");
        assert_eq!(activated.status, TicketStatus::Released);
        assert_eq!(activated.activated_by, "Carlos");

        // Second attempt conflicts and must not overwrite the first operator.
        let err = store
            .compare_and_activate(TicketCode::from("abc"), "Dani".to_string())
            .await
            .expect_err("second activation conflicts");
        assert_eq!(
            err,
            TicketStoreError::AlreadyActivated(TicketCode::from("abc"))
        );

        let current = store
            .get_by_code(TicketCode::from("abc"))
            .await
            .expect("lookup succeeds")
            .expect("ticket exists");
        assert_eq!(current.activated_by, "Carlos");
    }

    #[tokio::test]
    async fn activation_of_unknown_code_is_not_found() {
        let store = MemoryTicketStore::new();
        let err = store
            .compare_and_activate(TicketCode::from("ghost"), "Carlos".to_string())
            .await
            .expect_err("unknown code fails");
        assert_eq!(err, TicketStoreError::NotFound(TicketCode::from("ghost")));
    }

    #[tokio::test]
    async fn concurrent_activation_has_exactly_one_winner() {
        use std::sync::Arc;

        let store = Arc::new(MemoryTicketStore::new());
        store.insert(ticket("abc")).await.expect("insert succeeds");

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .compare_and_activate(TicketCode::from("abc"), format!("op-{i}"))
                    .await
            }));
        }

        let mut winners = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.expect("task completes") {
                Ok(_) => winners += 1,
                Err(TicketStoreError::AlreadyActivated(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(conflicts, 7);
    }
}
