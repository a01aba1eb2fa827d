//! Shared primitives for the turnstile ticketing system.
//!
//! This crate provides:
//! - Identifier newtypes for ledger-assigned ids and validated inputs
//! - Identity binding: a one-way, domain-separated hash tying a holder's
//!   phone to a specific event without storing the phone anywhere
//! - Payment reference hashing
//!
//! Core invariants:
//! - `IdentityBinder::bind` is a pure function of `(phone, event, secret)`
//! - Identity tokens never reveal the phone; ownership is proved by
//!   recomputation, not decryption
//! - Validation of input shape happens at parse time, never downstream
//!
#![deny(missing_docs)]

/// Identity binding and payment hashing.
pub mod binding;
/// Identifier newtypes.
pub mod identifiers;
/// Error types for input validation.
pub mod validation;

pub use binding::{hash_payment, IdentityBinder};
pub use identifiers::{EventId, IdentityToken, PaymentId, Phone, TicketId, TxRef};
pub use validation::ValidationError;
