//! Ledger record and operation types.

use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use turnstile_core::{EventId, IdentityToken, PaymentId, TicketId, TxRef};

use crate::error::LedgerError;

/// Domain separator for transaction references: `b"turnstile:tx:v1\0"`.
const TX_DOMAIN_SEPARATOR: &[u8] = b"turnstile:tx:v1\0";

/// Event record as stored on the ledger.
///
/// Identity fields are immutable after creation; `tickets_sold` is
/// monotonically non-decreasing and never exceeds `capacity`, and `active`
/// gates new sales only (inactive events still resolve on lookups).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event name.
    pub name: String,
    /// Venue or location string.
    pub location: String,
    /// Event date as unix seconds.
    pub date: u64,
    /// Ticket price in the smallest currency unit.
    pub price: u64,
    /// Maximum number of tickets.
    pub capacity: u32,
    /// Tickets minted so far.
    pub tickets_sold: u32,
    /// Whether new sales are allowed.
    pub active: bool,
}

/// Parameters for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Event name.
    pub name: String,
    /// Venue or location string.
    pub location: String,
    /// Event date as unix seconds.
    pub date: u64,
    /// Ticket price in the smallest currency unit.
    pub price: u64,
    /// Maximum number of tickets.
    pub capacity: u32,
}

/// Ticket record as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Event this ticket admits to.
    pub event_id: EventId,
    /// One-way binding of the holder's phone to the event.
    pub identity_token: IdentityToken,
    /// One-way hash of the payment reference.
    pub payment_id: PaymentId,
    /// Whether the ticket has been consumed at the gate.
    pub used: bool,
}

/// A single append-only ledger operation.
///
/// Ids are positional: the Nth `EventCreated` in the log defines event N,
/// the Nth `TicketMinted` defines ticket N. Replaying the log through the
/// transition rules reconstructs the full ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerOp {
    /// A new event was created.
    EventCreated(NewEvent),
    /// An event's sales gate was toggled.
    EventStatusSet {
        /// Target event.
        event_id: EventId,
        /// New gate value.
        active: bool,
    },
    /// A ticket was minted against an event's capacity.
    TicketMinted {
        /// Event the ticket admits to.
        event_id: EventId,
        /// Holder identity binding.
        identity_token: IdentityToken,
        /// Payment proof hash.
        payment_id: PaymentId,
    },
    /// A ticket was consumed at the gate.
    TicketUsed {
        /// Target ticket.
        ticket_id: TicketId,
        /// Holder identity binding, re-proved at confirm time.
        identity_token: IdentityToken,
    },
}

impl LedgerOp {
    /// Computes the content-derived transaction reference for this
    /// operation at log position `seq`.
    ///
    /// Formula: `base64url(sha256(domain_separator || seq_le || record_json))`.
    pub fn tx_ref(&self, seq: u64) -> Result<TxRef, LedgerError> {
        let mut hasher = Sha256::new();
        hasher.update(TX_DOMAIN_SEPARATOR);
        hasher.update(seq.to_le_bytes());
        hasher.update(serde_json::to_vec(self)?);
        let bytes = hasher.finalize();
        Ok(TxRef::new(
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes),
        ))
    }
}
