//! Ticket issuance and entry verification for the turnstile system.
//!
//! This crate provides:
//! - [`ChallengeStore`]: time-boxed, single-use secret codes with
//!   exactly-once consumption
//! - [`TicketIssuer`]: mints tickets against event capacity
//! - [`EntryVerifier`]: the two-phase (scan → confirm) admission state
//!   machine
//! - [`LoginFlow`] and [`TokenRegistry`]: phone login codes and bearer
//!   session credentials
//! - Listings, admin operations, configuration, and the wire-shape DTOs
//!
//! Core invariants:
//! - A ticket is consumed at most once, even under concurrent confirms;
//!   the ledger's one-way `used` transition is the source of truth
//! - A wrong entry code never destroys the pending challenge; expiry and
//!   successful consumption do
//! - Phone numbers are bound to tickets only as one-way identity tokens;
//!   the raw phone never reaches the ledger
//!
#![deny(missing_docs)]

/// Admin-gated event and ticket operations.
pub mod admin;
/// Generic single-use challenge codes.
pub mod challenge;
/// Service configuration.
pub mod config;
/// The admission state machine.
pub mod entry;
/// Service-level error taxonomy.
pub mod errors;
/// Ticket minting.
pub mod issuer;
/// Event and booking listings.
pub mod listing;
/// Phone login codes.
pub mod login;
/// Session credentials and claims.
pub mod session;
/// Dependency-injected composition root.
pub mod system;
/// Boundary request/response shapes.
pub mod wire;

pub use admin::{AdminDesk, CreatedEvent, TicketDetails};
pub use challenge::{
    generate_code, Challenge, ChallengeRejection, ChallengeStore, MemoryChallengeStore,
};
pub use config::{ConfigError, ServiceConfig};
pub use entry::{EntryClaim, EntryConfirm, EntryScan, EntryVerifier};
pub use errors::ServiceError;
pub use issuer::{IssuedTicket, TicketIssuer};
pub use listing::{
    all_bookings, bookings_for_event, event_summary, list_events, BookingSummary, EventSummary,
};
pub use login::{LoginCodeIssued, LoginFlow, LoginGrant};
pub use session::{Claims, SessionAuthority, SessionError, TokenRegistry};
pub use system::System;
