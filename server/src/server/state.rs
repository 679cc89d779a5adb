//! Application state for the Bilheteria HTTP server.

use axum::extract::FromRef;
use bilheteria_core::TicketService;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// The service is the only dependency the handlers need; it is constructed
/// once at process start with an injected store and cloned (cheaply via Arc)
/// for each request.
#[derive(Clone)]
pub struct AppState {
    /// The ticket service implementing the three operations of the system
    pub service: Arc<TicketService>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(service: Arc<TicketService>) -> Self {
        Self { service }
    }
}

// Allow extractors to get the service directly from AppState
impl FromRef<AppState> for Arc<TicketService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.service.clone()
    }
}
