//! # Bilheteria Core
//!
//! Domain model and service logic for the Bilheteria ticket-sales system.
//!
//! This crate provides everything that is independent of the transport and of
//! the concrete database:
//!
//! - **Ticket**: one unit of admission with a two-state lifecycle
//!   (awaiting payment → released, one-way)
//! - **`TicketStore`**: durable key-value store abstraction keyed by ticket code
//! - **`TicketService`**: the three operations of the system (issue a batch of
//!   tickets, activate one ticket exactly once, produce an aggregate report)
//! - **`SalesReport`**: the aggregate statistics computed over all tickets
//! - **`MemoryTicketStore`**: in-memory store for tests and local development
//!
//! ## Architecture Principles
//!
//! - The service is stateless between calls; all state lives in the store
//! - Dependency injection via the `TicketStore` trait (`Arc<dyn TicketStore>`)
//! - The only concurrency-sensitive operation is activation, which is pushed
//!   down into the store as a single atomic conditional transition
//!
//! ## Example
//!
//! ```
//! use bilheteria_core::{MemoryTicketStore, SaleRequest, TicketService};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), bilheteria_core::TicketServiceError> {
//! let store = Arc::new(MemoryTicketStore::new());
//! let service = TicketService::new(store, "secret".to_string(), 30.0)?;
//!
//! let codes = service
//!     .issue_batch(SaleRequest {
//!         buyer: "Ana".to_string(),
//!         seller: "Bia".to_string(),
//!         quantity: 2,
//!         payment_methods: vec!["pix".to_string()],
//!         amount_received: 60.0,
//!     })
//!     .await?;
//! assert_eq!(codes.len(), 2);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod memory;
pub mod report;
pub mod service;
pub mod store;
pub mod ticket;

pub use memory::MemoryTicketStore;
pub use report::SalesReport;
pub use service::{SaleRequest, TicketService, TicketServiceError};
pub use store::{TicketStore, TicketStoreError};
pub use ticket::{Ticket, TicketCode, TicketStatus};
