//! Ticket store abstraction.
//!
//! The store is a durable mapping from ticket code to ticket record. It is
//! deliberately small: insert, point lookup, one conditional transition, and a
//! full scan for reporting. It does NOT provide pagination, secondary indexes
//! or deletion — tickets are never deleted and the data set is bounded by one
//! event's sales volume.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync` so a single store instance can be
//! shared across request handlers.
//!
//! # Dyn Compatibility
//!
//! This trait uses explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` to enable trait object usage (`Arc<dyn TicketStore>`), which is
//! how the service receives its store at process start.

use crate::ticket::{Ticket, TicketCode};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, TicketStoreError>> + Send + 'a>>;

/// Errors that can occur during ticket store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketStoreError {
    /// A ticket with this code already exists.
    ///
    /// Practically unreachable given the code entropy budget, but the service
    /// handles it by retrying generation rather than failing the batch.
    #[error("Duplicate ticket code: {0}")]
    DuplicateCode(TicketCode),

    /// No ticket with this code exists.
    #[error("Ticket not found: {0}")]
    NotFound(TicketCode),

    /// The ticket was already activated by a previous call.
    ///
    /// A business-rule conflict, not a storage failure; exactly one of two
    /// concurrent activation attempts observes this error.
    #[error("Ticket already activated: {0}")]
    AlreadyActivated(TicketCode),

    /// Underlying storage failure (connection, query, corrupt row).
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Durable key-value store for tickets, keyed by code.
///
/// # Implementations
///
/// - **`PostgresTicketStore`** (production): one `tickets` table, row-level
///   atomic activation via a conditional `UPDATE`
/// - **`MemoryTicketStore`** (testing): `HashMap` behind a mutex
pub trait TicketStore: Send + Sync {
    /// Insert a new ticket record.
    ///
    /// # Errors
    ///
    /// - `DuplicateCode`: a ticket with this code already exists
    /// - `Storage`: the underlying store failed
    fn insert(&self, ticket: Ticket) -> StoreFuture<'_, ()>;

    /// Look up a ticket by code.
    ///
    /// Returns `Ok(None)` for an unknown code — absence is not an error at
    /// this layer.
    ///
    /// # Errors
    ///
    /// - `Storage`: the underlying store failed
    fn get_by_code(&self, code: TicketCode) -> StoreFuture<'_, Option<Ticket>>;

    /// Atomically transition a ticket to `Released`, attributing it to
    /// `operator`.
    ///
    /// This is the one place correctness depends on the store's concurrency
    /// behavior: the read-check-write must be atomic with respect to
    /// concurrent activation attempts on the same code, so that exactly one
    /// caller succeeds and every other caller observes `AlreadyActivated`.
    ///
    /// Returns the updated ticket on success.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no ticket with this code exists
    /// - `AlreadyActivated`: the ticket was already `Released`
    /// - `Storage`: the underlying store failed
    fn compare_and_activate(
        &self,
        code: TicketCode,
        operator: String,
    ) -> StoreFuture<'_, Ticket>;

    /// Load all ticket records for reporting.
    ///
    /// No pagination; the data set is one event's tickets.
    ///
    /// # Errors
    ///
    /// - `Storage`: the underlying store failed
    fn list_all(&self) -> StoreFuture<'_, Vec<Ticket>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_code_error_display() {
        let err = TicketStoreError::DuplicateCode(TicketCode::from("abc123"));
        assert_eq!(err.to_string(), "Duplicate ticket code: abc123");
    }

    #[test]
    fn already_activated_error_display() {
        let err = TicketStoreError::AlreadyActivated(TicketCode::from("abc123"));
        assert_eq!(err.to_string(), "Ticket already activated: abc123");
    }
}
