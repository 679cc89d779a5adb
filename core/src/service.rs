//! Ticket service: issue a batch, activate one, report over all.
//!
//! The service is stateless between calls; all state lives in the injected
//! [`TicketStore`]. Every failure is scoped to a single request — no error in
//! this module is fatal to the process.

use crate::report::SalesReport;
use crate::store::{TicketStore, TicketStoreError};
use crate::ticket::{Ticket, TicketCode, TicketStatus};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Upper bound on code regeneration attempts per ticket.
///
/// A single collision is already vanishingly unlikely; five in a row means
/// the store is misbehaving, not the generator.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Errors returned by the ticket service.
#[derive(Error, Debug)]
pub enum TicketServiceError {
    /// Malformed input, e.g. a zero quantity or an empty payment-method list.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The report access secret did not match the configured secret.
    #[error("Report access denied")]
    Forbidden,

    /// No ticket with this code exists.
    #[error("Ticket not found: {0}")]
    NotFound(TicketCode),

    /// The ticket was already activated.
    #[error("Ticket already activated: {0}")]
    AlreadyActivated(TicketCode),

    /// The store failed in a way the caller cannot correct.
    #[error("Store error: {0}")]
    Store(#[from] TicketStoreError),
}

/// One sale transaction: a request to issue a batch of tickets.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRequest {
    /// Who the tickets are for.
    pub buyer: String,
    /// Who sold them.
    pub seller: String,
    /// How many tickets to issue. Must be at least 1.
    pub quantity: u32,
    /// Payment-method labels for the sale. Must be non-empty.
    pub payment_methods: Vec<String>,
    /// Amount of money handed over for the sale.
    ///
    /// Accepted but not persisted or validated against quantity × price;
    /// callers must not rely on it being stored.
    pub amount_received: f64,
}

/// The three operations of the system on top of a [`TicketStore`].
///
/// Constructed once at process start with an injected store and validated
/// settings, then shared across request handlers.
pub struct TicketService {
    store: Arc<dyn TicketStore>,
    report_secret: String,
    ticket_price: f64,
}

impl TicketService {
    /// Create a new service.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `report_secret` is empty or `ticket_price` is
    /// negative — both are configuration mistakes better caught at startup
    /// than at request time.
    pub fn new(
        store: Arc<dyn TicketStore>,
        report_secret: String,
        ticket_price: f64,
    ) -> Result<Self, TicketServiceError> {
        if report_secret.is_empty() {
            return Err(TicketServiceError::Validation(
                "report secret must not be empty".to_string(),
            ));
        }
        if ticket_price < 0.0 {
            return Err(TicketServiceError::Validation(
                "ticket price must not be negative".to_string(),
            ));
        }
        Ok(Self {
            store,
            report_secret,
            ticket_price,
        })
    }

    /// Access the underlying store.
    ///
    /// Used by the server's readiness probe to check store connectivity.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn TicketStore> {
        &self.store
    }

    /// Issue `sale.quantity` tickets, one durable record per unit.
    ///
    /// Returns the generated codes in generation order. Each ticket starts
    /// in `AwaitingPayment` with an empty `activated_by`.
    ///
    /// # Errors
    ///
    /// - `Validation`: `quantity` is zero or `payment_methods` is empty
    /// - `Store`: the store failed, or code generation kept colliding
    pub async fn issue_batch(
        &self,
        sale: SaleRequest,
    ) -> Result<Vec<TicketCode>, TicketServiceError> {
        if sale.quantity == 0 {
            return Err(TicketServiceError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }
        if sale.payment_methods.is_empty() {
            return Err(TicketServiceError::Validation(
                "at least one payment method is required".to_string(),
            ));
        }

        let sold_at = Utc::now();
        let mut codes = Vec::with_capacity(sale.quantity as usize);
        for _ in 0..sale.quantity {
            codes.push(self.insert_with_fresh_code(&sale, sold_at).await?);
        }

        info!(
            quantity = sale.quantity,
            buyer = %sale.buyer,
            seller = %sale.seller,
            "Tickets issued"
        );
        Ok(codes)
    }

    /// Insert one ticket, regenerating the code on a duplicate-key collision.
    async fn insert_with_fresh_code(
        &self,
        sale: &SaleRequest,
        sold_at: chrono::DateTime<Utc>,
    ) -> Result<TicketCode, TicketServiceError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = TicketCode::generate();
            let ticket = Ticket {
                code: code.clone(),
                status: TicketStatus::AwaitingPayment,
                payment_methods: sale.payment_methods.clone(),
                sold_at,
                seller: sale.seller.clone(),
                activated_by: String::new(),
                buyer: sale.buyer.clone(),
            };

            match self.store.insert(ticket).await {
                Ok(()) => return Ok(code),
                Err(TicketStoreError::DuplicateCode(code)) => {
                    warn!(attempt, code = %code, "Generated a colliding ticket code, retrying");
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(TicketServiceError::Store(TicketStoreError::Storage(
            format!("code generation collided {MAX_CODE_ATTEMPTS} times in a row"),
        )))
    }

    /// Activate a ticket exactly once, attributing it to `operator`.
    ///
    /// Returns the updated ticket.
    ///
    /// # Errors
    ///
    /// - `Validation`: `operator` is empty; a released ticket must always
    ///   carry an attribution
    /// - `NotFound`: no ticket with this code was ever issued
    /// - `AlreadyActivated`: a previous call already released this ticket;
    ///   the first operator attribution is left untouched
    /// - `Store`: the store failed
    pub async fn activate(
        &self,
        code: TicketCode,
        operator: String,
    ) -> Result<Ticket, TicketServiceError> {
        if operator.is_empty() {
            return Err(TicketServiceError::Validation(
                "operator must not be empty".to_string(),
            ));
        }

        match self.store.compare_and_activate(code, operator).await {
            Ok(ticket) => {
                info!(code = %ticket.code, operator = %ticket.activated_by, "Ticket activated");
                Ok(ticket)
            }
            Err(TicketStoreError::NotFound(code)) => Err(TicketServiceError::NotFound(code)),
            Err(TicketStoreError::AlreadyActivated(code)) => {
                Err(TicketServiceError::AlreadyActivated(code))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Produce the aggregate sales report.
    ///
    /// The secret is checked before anything is loaded; a wrong secret
    /// performs no aggregation.
    ///
    /// # Errors
    ///
    /// - `Forbidden`: `access_secret` does not match the configured secret
    /// - `Store`: the store failed
    pub async fn report(&self, access_secret: &str) -> Result<SalesReport, TicketServiceError> {
        if access_secret != self.report_secret {
            warn!("Report requested with a wrong access secret");
            return Err(TicketServiceError::Forbidden);
        }

        let tickets = self.store.list_all().await?;
        Ok(SalesReport::from_tickets(&tickets, self.ticket_price))
    }
}
