//! # Bilheteria Server
//!
//! HTTP surface of the Bilheteria ticket-sales system.
//!
//! Thin plumbing over `bilheteria-core`: request validation, routing and
//! error-to-status mapping. All business rules live in the core service; the
//! handlers here are adapters.
//!
//! ## Endpoints
//!
//! - `POST /api/sales` — issue a batch of tickets for one sale
//! - `POST /api/activate` — activate one ticket exactly once
//! - `POST /api/report` — aggregate sales report, guarded by a shared secret
//! - `GET /health`, `GET /ready` — liveness and readiness probes

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod server;
