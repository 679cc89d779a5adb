//! Bilheteria HTTP server.
//!
//! Ticket-sales and activation service: issues ticket codes against a sale,
//! activates each code exactly once, and reports aggregate sales statistics.

use bilheteria_core::TicketService;
use bilheteria_postgres::PostgresTicketStore;
use bilheteria_server::{
    config::Config,
    server::{AppState, build_router},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bilheteria=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bilheteria HTTP server");

    // Load configuration
    let config = Config::from_env();
    info!(database_url = %config.database.url, "Configuration loaded");

    // Setup ticket store
    info!("Connecting to ticket store database...");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
        .connect(&config.database.url)
        .await?;
    let store = Arc::new(PostgresTicketStore::from_pool(pool));
    store.migrate().await?;
    info!("Ticket store connected");

    // Setup ticket service (validates report secret and ticket price)
    let service = Arc::new(TicketService::new(
        store,
        config.sales.report_secret.clone(),
        config.sales.ticket_price,
    )?);

    // Build application state and router
    let state = AppState::new(service);
    let app = build_router(state);

    // Create server address
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Starting HTTP server");

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM (in production environments)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
