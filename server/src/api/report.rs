//! Sales report endpoint.
//!
//! `POST /api/report` returns aggregate statistics over all tickets ever
//! issued. Guarded by the configured shared secret — the system's only
//! access control.

use crate::error::AppError;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use bilheteria_core::SalesReport;
use serde::Deserialize;

/// Request for the aggregate sales report.
#[derive(Debug, Deserialize)]
pub struct SalesReportRequest {
    /// Shared report secret
    pub access_secret: String,
}

/// Produce the aggregate sales report.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/report \
///   -H "Content-Type: application/json" \
///   -d '{"access_secret": "..."}'
/// ```
pub async fn sales_report(
    State(state): State<AppState>,
    Json(request): Json<SalesReportRequest>,
) -> Result<Json<SalesReport>, AppError> {
    let report = state.service.report(&request.access_secret).await?;
    Ok(Json(report))
}
