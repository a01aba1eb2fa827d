use thiserror::Error;
use turnstile_core::{EventId, TicketId};
use turnstile_ledger::LedgerError;

use crate::session::SessionError;

/// Service-level rejection taxonomy.
///
/// Every variant corresponds to one caller-visible failure mode; none are
/// collapsed, because callers word their responses (and choose retry
/// behavior) per case. `status_code` gives the conventional HTTP mapping
/// for boundary layers.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed input: missing fields, bad phone shape, empty names.
    #[error("{0}")]
    Validation(String),
    /// Unknown event.
    #[error("event {0} not found")]
    EventNotFound(EventId),
    /// Unknown ticket.
    #[error("ticket {0} not found")]
    TicketNotFound(TicketId),
    /// Event exists but is closed for sales.
    #[error("event {0} is not active")]
    EventInactive(EventId),
    /// Event has no remaining capacity.
    #[error("event {0} is sold out")]
    SoldOut(EventId),
    /// Ticket has already been consumed; terminal, not retryable.
    #[error("ticket {0} has already been used")]
    AlreadyUsed(TicketId),
    /// The ticket is bound to a different holder.
    #[error("ticket does not belong to this holder")]
    OwnershipMismatch,
    /// The confirmed phone differs from the one that was scanned.
    #[error("phone does not match the scanned holder")]
    PhoneMismatch,
    /// No entry challenge is pending; the gate must scan first.
    #[error("no pending entry for this ticket; scan first")]
    NoPendingEntry,
    /// No login code is pending for this phone.
    #[error("no login code pending; request one first")]
    NoPendingLogin,
    /// The code's TTL elapsed; a fresh scan or login request is needed.
    #[error("code expired")]
    CodeExpired,
    /// Wrong code; retryable until the TTL elapses.
    #[error("invalid code")]
    CodeMismatch,
    /// The presented credential failed validation.
    #[error("invalid or expired credential: {0}")]
    InvalidCredential(#[from] SessionError),
    /// The caller lacks admin privileges.
    #[error("admin privileges required")]
    Forbidden,
    /// A ledger submission failed before any challenge was consumed.
    #[error("ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),
    /// A ledger submission failed *after* the entry challenge was
    /// consumed. Surfaced distinctly so the operator knows the code is
    /// spent and the holder must be re-scanned; the ledger state did not
    /// change, so re-scan + re-confirm is safe.
    #[error("entry code accepted but ledger update failed; scan again to retry: {source}")]
    ConfirmNotFinalized {
        /// The underlying ledger failure.
        source: LedgerError,
    },
}

impl ServiceError {
    /// Conventional HTTP status for this rejection.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) | ServiceError::CodeMismatch => 400,
            ServiceError::InvalidCredential(_) => 401,
            ServiceError::OwnershipMismatch
            | ServiceError::PhoneMismatch
            | ServiceError::Forbidden => 403,
            ServiceError::EventNotFound(_)
            | ServiceError::TicketNotFound(_)
            | ServiceError::NoPendingEntry
            | ServiceError::NoPendingLogin => 404,
            ServiceError::EventInactive(_)
            | ServiceError::SoldOut(_)
            | ServiceError::AlreadyUsed(_) => 409,
            ServiceError::CodeExpired => 410,
            ServiceError::Ledger(_) | ServiceError::ConfirmNotFinalized { .. } => 502,
        }
    }
}
