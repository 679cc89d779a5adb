//! Ticket domain types.
//!
//! A ticket is one unit of admission, identified by a short opaque code. Its
//! lifecycle is the only state machine in the system: two states, one
//! irreversible transition performed by activation.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of characters in a generated ticket code.
///
/// Ten alphanumeric characters carry just under 60 bits of entropy, keeping
/// the birthday-collision probability negligible at single-event ticket
/// volumes. Collisions are still handled (see `TicketStoreError::DuplicateCode`).
pub const CODE_LENGTH: usize = 10;

/// Short opaque identifier for a ticket.
///
/// Unique across all tickets and immutable once created. Codes are generated
/// randomly at issuance; uniqueness is probabilistic and backed by the store's
/// duplicate-key check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketCode(String);

impl TicketCode {
    /// Wrap an existing code, e.g. one received in a request or read back
    /// from storage.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generate a fresh random code.
    #[must_use]
    pub fn generate() -> Self {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CODE_LENGTH)
            .map(char::from)
            .collect();
        Self(code)
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Issued; payment not yet confirmed by an operator.
    AwaitingPayment,
    /// Activated by an operator. Terminal state.
    Released,
}

impl TicketStatus {
    /// Storage representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingPayment => "awaiting_payment",
            Self::Released => "released",
        }
    }

    /// Parse the storage representation back into a status.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "awaiting_payment" => Some(Self::AwaitingPayment),
            "released" => Some(Self::Released),
            _ => None,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of admission.
///
/// Every field except `status` and `activated_by` is immutable once the
/// record is created. `activated_by` is non-empty iff `status` is `Released`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Primary key.
    pub code: TicketCode,
    /// Lifecycle status.
    pub status: TicketStatus,
    /// Payment-method labels chosen at issuance, in the order given.
    ///
    /// Modeled as a genuine list at every layer of the contract so a label
    /// containing a delimiter character can never corrupt the set.
    pub payment_methods: Vec<String>,
    /// Creation timestamp.
    pub sold_at: DateTime<Utc>,
    /// Who sold the ticket.
    pub seller: String,
    /// Operator who activated the ticket. Empty until activation.
    pub activated_by: String,
    /// Who the ticket is for.
    pub buyer: String,
}

impl Ticket {
    /// Whether the ticket has been activated.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        matches!(self.status, TicketStatus::Released)
    }
}
