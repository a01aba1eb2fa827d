use thiserror::Error;
use turnstile_core::{EventId, TicketId};

/// Errors that can occur during ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// No event exists with the given id.
    #[error("event {0} not found")]
    EventNotFound(EventId),
    /// No ticket exists with the given id.
    #[error("ticket {0} not found")]
    TicketNotFound(TicketId),
    /// Event exists but is closed for new sales.
    #[error("event {0} is not active")]
    EventInactive(EventId),
    /// Event has no remaining capacity.
    #[error("event {0} is sold out")]
    SoldOut(EventId),
    /// Ticket has already been marked used; the transition is one-way.
    #[error("ticket {0} has already been used")]
    AlreadyUsed(TicketId),
    /// Supplied identity token does not match the one minted on the ticket.
    #[error("identity token does not match ticket {0}")]
    TokenMismatch(TicketId),
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Record (de)serialization error.
    #[error("record serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid journal file header (magic, version, or flags).
    #[error("invalid ledger journal header: {0}")]
    InvalidHeader(String),
    /// Invalid frame structure or a record that violates transition rules.
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Truncated frame detected in strict mode.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset where truncation occurred.
        offset: u64,
    },
    /// Record payload exceeds the maximum frame size.
    #[error("record size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: u32,
        /// Maximum allowed size.
        max: u32,
    },
}
