//! Append-only ticket ledger for the turnstile ticketing system.
//!
//! This crate provides:
//! - The [`TicketLedger`] trait: the blocking read/write contract the
//!   service layer programs against
//! - [`MemoryLedger`]: a mutex-guarded in-memory backend for tests and
//!   embedding
//! - [`JournalLedger`]: a journal-file backend that replays an append-only
//!   record log into state on open
//!
//! The ledger is the system of record and the sole authority for its
//! transition rules: an event's `tickets_sold` never exceeds `capacity`,
//! minting against an inactive event is rejected, and a ticket's `used`
//! flag transitions false→true exactly once, only with a matching identity
//! token. Both backends funnel every write through one shared transition
//! function, so the rules cannot drift between them. Callers may pre-check
//! the same conditions as a fast path, but must not rely on those checks.
//!
//! Every state-changing operation blocks until the write is finalized
//! (visible to subsequent reads) and returns an opaque [`TxRef`].
//!
//! [`TxRef`]: turnstile_core::TxRef

#![deny(missing_docs)]

/// Error types for ledger operations.
pub mod error;
/// Journal-file backend.
pub mod journal;
/// In-memory backend.
pub mod memory;
/// Record and operation types.
pub mod records;
/// Replayable ledger state and transition rules.
mod state;
/// The ledger contract trait.
pub mod traits;

pub use error::LedgerError;
pub use journal::{JournalLedger, JournalOptions, ReadMode};
pub use memory::MemoryLedger;
pub use records::{EventRecord, LedgerOp, NewEvent, TicketRecord};
pub use traits::TicketLedger;
