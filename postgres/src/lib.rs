//! `PostgreSQL` ticket store implementation for Bilheteria.
//!
//! This crate provides a production-ready `PostgreSQL`-based ticket store that
//! implements the `TicketStore` trait from `bilheteria-core`. It uses sqlx and
//! supports:
//!
//! - Durable ticket persistence surviving process restarts
//! - Atomic single-row activation via a conditional `UPDATE`
//! - Connection pooling
//! - Payment methods stored as a genuine `TEXT[]` column, never a delimited
//!   string
//!
//! # Example
//!
//! ```ignore
//! use bilheteria_postgres::PostgresTicketStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresTicketStore::connect("postgres://localhost/bilheteria").await?;
//!     store.migrate().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use bilheteria_core::store::{StoreFuture, TicketStore, TicketStoreError};
use bilheteria_core::ticket::{Ticket, TicketCode, TicketStatus};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

/// SQLSTATE for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Row shape shared by every query that reads a full ticket.
type TicketRow = (
    String,            // code
    String,            // status
    Vec<String>,       // payment_methods
    DateTime<Utc>,     // sold_at
    String,            // seller
    String,            // activated_by
    String,            // buyer
);

const TICKET_COLUMNS: &str = "code, status, payment_methods, sold_at, seller, activated_by, buyer";

/// `PostgreSQL`-backed ticket store.
///
/// One `tickets` table keyed by `code`. Activation relies on the row-level
/// atomicity of a single conditional `UPDATE`, so no in-process locking is
/// needed even under concurrent activation attempts for the same code.
#[derive(Clone)]
pub struct PostgresTicketStore {
    pool: PgPool,
}

impl PostgresTicketStore {
    /// Connect to the given database URL with default pool settings.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, TicketStoreError> {
        let pool = PgPool::connect(url)
            .await
            .map_err(|e| TicketStoreError::Storage(format!("Failed to connect: {e}")))?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying connection pool.
    ///
    /// Useful for health checks or manual queries.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `tickets` table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the DDL statement fails.
    pub async fn migrate(&self) -> Result<(), TicketStoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tickets (
                code TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                payment_methods TEXT[] NOT NULL,
                sold_at TIMESTAMPTZ NOT NULL,
                seller TEXT NOT NULL,
                activated_by TEXT NOT NULL DEFAULT '',
                buyer TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| TicketStoreError::Storage(format!("Failed to create tickets table: {e}")))?;

        debug!("Tickets schema is up to date");
        Ok(())
    }
}

fn row_to_ticket(row: TicketRow) -> Result<Ticket, TicketStoreError> {
    let (code, status, payment_methods, sold_at, seller, activated_by, buyer) = row;
    let status = TicketStatus::parse(&status)
        .ok_or_else(|| TicketStoreError::Storage(format!("Corrupt status value: {status}")))?;
    Ok(Ticket {
        code: TicketCode::new(code),
        status,
        payment_methods,
        sold_at,
        seller,
        activated_by,
        buyer,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
    )
}

impl TicketStore for PostgresTicketStore {
    fn insert(&self, ticket: Ticket) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query(
                "INSERT INTO tickets (code, status, payment_methods, sold_at, seller, activated_by, buyer)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(ticket.code.as_str())
            .bind(ticket.status.as_str())
            .bind(&ticket.payment_methods)
            .bind(ticket.sold_at)
            .bind(&ticket.seller)
            .bind(&ticket.activated_by)
            .bind(&ticket.buyer)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    TicketStoreError::DuplicateCode(ticket.code.clone())
                } else {
                    TicketStoreError::Storage(format!("Failed to insert ticket: {e}"))
                }
            })?;

            Ok(())
        })
    }

    fn get_by_code(&self, code: TicketCode) -> StoreFuture<'_, Option<Ticket>> {
        Box::pin(async move {
            let row: Option<TicketRow> = sqlx::query_as(&format!(
                "SELECT {TICKET_COLUMNS} FROM tickets WHERE code = $1"
            ))
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TicketStoreError::Storage(format!("Failed to load ticket: {e}")))?;

            row.map(row_to_ticket).transpose()
        })
    }

    fn compare_and_activate(
        &self,
        code: TicketCode,
        operator: String,
    ) -> StoreFuture<'_, Ticket> {
        Box::pin(async move {
            // The WHERE clause makes the read-check-write a single atomic
            // row-level operation: of two concurrent callers, exactly one
            // matches the awaiting row and gets it back.
            let updated: Option<TicketRow> = sqlx::query_as(&format!(
                "UPDATE tickets
                 SET status = $3, activated_by = $2
                 WHERE code = $1 AND status = $4
                 RETURNING {TICKET_COLUMNS}"
            ))
            .bind(code.as_str())
            .bind(&operator)
            .bind(TicketStatus::Released.as_str())
            .bind(TicketStatus::AwaitingPayment.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TicketStoreError::Storage(format!("Failed to activate ticket: {e}")))?;

            if let Some(row) = updated {
                return row_to_ticket(row);
            }

            // No row transitioned: distinguish an unknown code from a ticket
            // that was already released.
            let exists: Option<(bool,)> =
                sqlx::query_as("SELECT true FROM tickets WHERE code = $1")
                    .bind(code.as_str())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| {
                        TicketStoreError::Storage(format!("Failed to check ticket: {e}"))
                    })?;

            if exists.is_some() {
                Err(TicketStoreError::AlreadyActivated(code))
            } else {
                Err(TicketStoreError::NotFound(code))
            }
        })
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<Ticket>> {
        Box::pin(async move {
            let rows: Vec<TicketRow> = sqlx::query_as(&format!(
                "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY sold_at, code"
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TicketStoreError::Storage(format!("Failed to list tickets: {e}")))?;

            rows.into_iter().map(row_to_ticket).collect()
        })
    }
}
