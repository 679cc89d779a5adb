//! Aggregate sales report.
//!
//! A single full-table fold over all tickets; there is no incremental or
//! streaming requirement at this system's scale.

use crate::ticket::Ticket;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate statistics over all tickets ever issued.
///
/// Maps are `BTreeMap` so serialized reports are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    /// Count of all tickets ever issued.
    pub total_sold: u64,
    /// Count of tickets with status `Released`.
    pub total_activated: u64,
    /// `total_sold` times the configured per-ticket price.
    ///
    /// The price is configuration, deliberately decoupled from the
    /// `amount_received` reported at issuance time.
    pub total_value: f64,
    /// Count of tickets per payment-method label.
    ///
    /// A ticket with several methods contributes to each method's count —
    /// this is a multi-count, not a partition, so the bucket counts can sum
    /// to more than `total_sold`.
    pub by_payment_method: BTreeMap<String, u64>,
    /// Count of tickets per seller.
    pub by_seller: BTreeMap<String, u64>,
    /// Count of tickets per buyer.
    pub by_buyer: BTreeMap<String, u64>,
}

impl SalesReport {
    /// Fold all tickets into an aggregate report.
    #[must_use]
    pub fn from_tickets(tickets: &[Ticket], ticket_price: f64) -> Self {
        let total_sold = tickets.len() as u64;
        let total_activated = tickets.iter().filter(|t| t.is_released()).count() as u64;

        let mut by_payment_method: BTreeMap<String, u64> = BTreeMap::new();
        let mut by_seller: BTreeMap<String, u64> = BTreeMap::new();
        let mut by_buyer: BTreeMap<String, u64> = BTreeMap::new();

        for ticket in tickets {
            for method in &ticket.payment_methods {
                *by_payment_method.entry(method.clone()).or_insert(0) += 1;
            }
            *by_seller.entry(ticket.seller.clone()).or_insert(0) += 1;
            *by_buyer.entry(ticket.buyer.clone()).or_insert(0) += 1;
        }

        #[allow(clippy::cast_precision_loss)] // Ticket counts stay far below 2^52
        let total_value = total_sold as f64 * ticket_price;

        Self {
            total_sold,
            total_activated,
            total_value,
            by_payment_method,
            by_seller,
            by_buyer,
        }
    }
}
