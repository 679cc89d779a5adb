//! Router configuration for the Bilheteria server.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{health_check, readiness_check};
use super::state::AppState;
use crate::api::{activation, report, sales};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Configures all routes:
/// - Health checks (liveness and readiness)
/// - Sale registration
/// - Ticket activation
/// - Sales report
///
/// The CORS layer is permissive — the original deployment serves a browser
/// frontend from a different origin.
///
/// # Arguments
///
/// - `state`: Application state to share with handlers
///
/// # Returns
///
/// Configured Axum router ready to serve requests.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/sales", post(sales::register_sale))
        .route("/activate", post(activation::activate_ticket))
        .route("/report", post(report::sales_report));

    Router::new()
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // API routes under /api prefix
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)] // Test code uses expect for clear failure messages

    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use bilheteria_core::{MemoryTicketStore, TicketService};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let store = Arc::new(MemoryTicketStore::new());
        let service = Arc::new(
            TicketService::new(store, "segredo".to_string(), 30.0)
                .expect("valid service settings"),
        );
        build_router(AppState::new(service))
    }

    async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("request is handled");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is JSON")
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_endpoint_is_ok() {
        let app = test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request is handled");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_endpoint_reports_store_reachable() {
        let app = test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request is handled");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn full_sale_activation_and_report_flow() {
        let app = test_router();

        // Issue two tickets for Ana, sold by Bia, paid via pix.
        let (status, body) = post_json(
            &app,
            "/api/sales",
            &json!({
                "buyer": "Ana",
                "seller": "Bia",
                "quantity": 2,
                "payment_methods": ["pix"],
                "amount_received": 60.0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let codes: Vec<String> = body["codes"]
            .as_array()
            .expect("codes is an array")
            .iter()
            .map(|c| c.as_str().expect("code is a string").to_string())
            .collect();
        assert_eq!(codes.len(), 2);
        assert_ne!(codes[0], codes[1]);

        // Report right after issuance.
        let (status, body) =
            post_json(&app, "/api/report", &json!({"access_secret": "segredo"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_sold"], json!(2));
        assert_eq!(body["total_activated"], json!(0));
        assert_eq!(body["total_value"], json!(60.0));
        assert_eq!(body["by_payment_method"], json!({"pix": 2}));
        assert_eq!(body["by_seller"], json!({"Bia": 2}));
        assert_eq!(body["by_buyer"], json!({"Ana": 2}));

        // Activate the first ticket.
        let (status, body) = post_json(
            &app,
            "/api/activate",
            &json!({"code": codes[0], "operator": "Carlos"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], json!(codes[0]));
        assert_eq!(
            body["message"],
            json!(format!("Ticket {} activated.", codes[0]))
        );

        // The report reflects the activation.
        let (status, body) =
            post_json(&app, "/api/report", &json!({"access_secret": "segredo"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_sold"], json!(2));
        assert_eq!(body["total_activated"], json!(1));
    }

    #[tokio::test]
    async fn second_activation_returns_conflict() {
        let app = test_router();

        let (_, body) = post_json(
            &app,
            "/api/sales",
            &json!({
                "buyer": "Ana",
                "seller": "Bia",
                "quantity": 1,
                "payment_methods": ["pix"],
                "amount_received": 30.0
            }),
        )
        .await;
        let code = body["codes"][0].as_str().expect("code is a string").to_string();

        let (status, _) = post_json(
            &app,
            "/api/activate",
            &json!({"code": code, "operator": "Carlos"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post_json(
            &app,
            "/api/activate",
            &json!({"code": code, "operator": "Dani"}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], json!("CONFLICT"));
    }

    #[tokio::test]
    async fn activating_unknown_code_returns_not_found() {
        let app = test_router();

        let (status, body) = post_json(
            &app,
            "/api/activate",
            &json!({"code": "ghost", "operator": "Carlos"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn report_with_wrong_secret_is_forbidden() {
        let app = test_router();

        let (status, body) =
            post_json(&app, "/api/report", &json!({"access_secret": "errado"})).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], json!("FORBIDDEN"));
    }

    #[tokio::test]
    async fn zero_quantity_sale_is_rejected() {
        let app = test_router();

        let (status, body) = post_json(
            &app,
            "/api/sales",
            &json!({
                "buyer": "Ana",
                "seller": "Bia",
                "quantity": 0,
                "payment_methods": ["pix"],
                "amount_received": 0.0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn sale_without_payment_methods_is_rejected() {
        let app = test_router();

        let (status, body) = post_json(
            &app,
            "/api/sales",
            &json!({
                "buyer": "Ana",
                "seller": "Bia",
                "quantity": 1,
                "payment_methods": [],
                "amount_received": 30.0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn multi_method_sale_counts_in_every_bucket() {
        let app = test_router();

        let (status, _) = post_json(
            &app,
            "/api/sales",
            &json!({
                "buyer": "Ana",
                "seller": "Bia",
                "quantity": 1,
                "payment_methods": ["pix", "cartao"],
                "amount_received": 30.0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) =
            post_json(&app, "/api/report", &json!({"access_secret": "segredo"})).await;
        assert_eq!(body["by_payment_method"], json!({"pix": 1, "cartao": 1}));
    }
}
