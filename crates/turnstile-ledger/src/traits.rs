//! The ledger contract trait.

use turnstile_core::{EventId, IdentityToken, PaymentId, TicketId, TxRef};

use crate::error::LedgerError;
use crate::records::{EventRecord, NewEvent, TicketRecord};

/// Blocking read/write façade over the ticket ledger.
///
/// Every state-changing method submits a single operation and blocks until
/// it is finalized: on `Ok`, the effect is visible to subsequent reads
/// through the same handle. Implementations enforce the transition rules
/// authoritatively and serialize conflicting writes internally; callers
/// never observe partial results.
///
/// Methods take `&self`; backends use interior locking, so a ledger handle
/// can be shared across request threads behind an `Arc`.
pub trait TicketLedger: Send + Sync {
    /// Looks up an event record.
    fn get_event(&self, id: EventId) -> Result<EventRecord, LedgerError>;

    /// Looks up a ticket record.
    fn get_ticket(&self, id: TicketId) -> Result<TicketRecord, LedgerError>;

    /// Creates an event, returning its assigned id.
    ///
    /// New events start active with zero tickets sold.
    fn create_event(&self, event: NewEvent) -> Result<(EventId, TxRef), LedgerError>;

    /// Opens or closes an event for new sales.
    fn set_event_status(&self, id: EventId, active: bool) -> Result<TxRef, LedgerError>;

    /// Mints a ticket against an event's capacity.
    ///
    /// Re-validates `active` and capacity regardless of any caller-side
    /// pre-checks; rejects with [`LedgerError::EventInactive`] or
    /// [`LedgerError::SoldOut`].
    fn mint_ticket(
        &self,
        event_id: EventId,
        identity_token: IdentityToken,
        payment_id: PaymentId,
    ) -> Result<(TicketId, TxRef), LedgerError>;

    /// Marks a ticket used: the one-way consumption transition.
    ///
    /// Rejects with [`LedgerError::AlreadyUsed`] if the ticket was already
    /// consumed and [`LedgerError::TokenMismatch`] if the supplied token
    /// does not match the minted one.
    fn mark_used(&self, ticket_id: TicketId, identity_token: IdentityToken)
        -> Result<TxRef, LedgerError>;

    /// Number of events ever created.
    fn total_events(&self) -> Result<u64, LedgerError>;

    /// Ids of all tickets bound to the given identity token.
    ///
    /// Ordering is not significant to callers.
    fn user_tickets(&self, token: &IdentityToken) -> Result<Vec<TicketId>, LedgerError>;
}
