//! Sale registration endpoint.
//!
//! `POST /api/sales` issues a batch of tickets for one sale transaction,
//! one durable record per unit of quantity.

use crate::error::AppError;
use crate::server::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use bilheteria_core::SaleRequest;
use serde::{Deserialize, Serialize};

/// Request to register a sale and issue its tickets.
#[derive(Debug, Deserialize)]
pub struct RegisterSaleRequest {
    /// Who the tickets are for
    pub buyer: String,
    /// Who sold them
    pub seller: String,
    /// Number of tickets to issue (at least 1)
    pub quantity: u32,
    /// Payment-method labels, in order (non-empty)
    pub payment_methods: Vec<String>,
    /// Amount of money handed over; accepted but not persisted
    pub amount_received: f64,
}

/// Response after registering a sale.
#[derive(Debug, Serialize)]
pub struct RegisterSaleResponse {
    /// Success message
    pub message: String,
    /// Generated ticket codes, in generation order
    pub codes: Vec<String>,
}

/// Register a sale and issue its tickets.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/sales \
///   -H "Content-Type: application/json" \
///   -d '{
///     "buyer": "Ana",
///     "seller": "Bia",
///     "quantity": 2,
///     "payment_methods": ["pix"],
///     "amount_received": 60.0
///   }'
/// ```
pub async fn register_sale(
    State(state): State<AppState>,
    Json(request): Json<RegisterSaleRequest>,
) -> Result<(StatusCode, Json<RegisterSaleResponse>), AppError> {
    let codes = state
        .service
        .issue_batch(SaleRequest {
            buyer: request.buyer,
            seller: request.seller,
            quantity: request.quantity,
            payment_methods: request.payment_methods,
            amount_received: request.amount_received,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterSaleResponse {
            message: "Tickets registered successfully.".to_string(),
            codes: codes.into_iter().map(|c| c.to_string()).collect(),
        }),
    ))
}
