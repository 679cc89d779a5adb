//! Ticket activation endpoint.
//!
//! `POST /api/activate` marks one ticket as released, attributed to the
//! operator performing it. The transition happens exactly once; repeated
//! calls get a 409 and leave the first attribution untouched.

use crate::error::AppError;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use bilheteria_core::TicketCode;
use serde::{Deserialize, Serialize};

/// Request to activate a ticket.
#[derive(Debug, Deserialize)]
pub struct ActivateTicketRequest {
    /// The ticket code to activate
    pub code: String,
    /// Operator performing the activation
    pub operator: String,
}

/// Response after a successful activation.
#[derive(Debug, Serialize)]
pub struct ActivateTicketResponse {
    /// Confirmation message
    pub message: String,
    /// The activated ticket code
    pub code: String,
}

/// Activate a ticket exactly once.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/activate \
///   -H "Content-Type: application/json" \
///   -d '{"code": "a1B2c3D4e5", "operator": "Carlos"}'
/// ```
pub async fn activate_ticket(
    State(state): State<AppState>,
    Json(request): Json<ActivateTicketRequest>,
) -> Result<Json<ActivateTicketResponse>, AppError> {
    let ticket = state
        .service
        .activate(TicketCode::new(request.code), request.operator)
        .await?;

    Ok(Json(ActivateTicketResponse {
        message: format!("Ticket {} activated.", ticket.code),
        code: ticket.code.to_string(),
    }))
}
