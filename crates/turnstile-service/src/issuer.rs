//! Ticket minting.

use std::sync::Arc;

use turnstile_core::{hash_payment, EventId, IdentityBinder, Phone, TicketId, TxRef};
use turnstile_ledger::{LedgerError, TicketLedger};

use crate::errors::ServiceError;

/// A freshly minted ticket.
#[derive(Debug, Clone)]
pub struct IssuedTicket {
    /// Ledger-assigned ticket id.
    pub ticket_id: TicketId,
    /// Event the ticket admits to.
    pub event_id: EventId,
    /// Reference of the finalized mint.
    pub tx_ref: TxRef,
}

/// Mints tickets against an event's capacity.
pub struct TicketIssuer {
    ledger: Arc<dyn TicketLedger>,
    binder: Arc<IdentityBinder>,
}

impl TicketIssuer {
    /// Creates an issuer over the given ledger and binder.
    pub fn new(ledger: Arc<dyn TicketLedger>, binder: Arc<IdentityBinder>) -> Self {
        Self { ledger, binder }
    }

    /// Issues a ticket for `event_id` to the holder identified by `phone`.
    ///
    /// Preconditions are checked in order, first failure wins: the event
    /// must exist, be active, and have capacity left. These checks are a
    /// fast path to avoid needless submissions; the ledger re-validates
    /// all of them when the mint is applied, and its verdict wins under
    /// races.
    pub fn issue(
        &self,
        event_id: EventId,
        phone: &Phone,
        payment_reference: &str,
    ) -> Result<IssuedTicket, ServiceError> {
        if payment_reference.is_empty() {
            return Err(ServiceError::Validation(
                "payment reference required".to_string(),
            ));
        }

        let event = self
            .ledger
            .get_event(event_id)
            .map_err(|e| map_event_error(e, event_id))?;
        if !event.active {
            return Err(ServiceError::EventInactive(event_id));
        }
        if event.tickets_sold >= event.capacity {
            return Err(ServiceError::SoldOut(event_id));
        }

        let identity_token = self.binder.bind(phone, event_id);
        let payment_id = hash_payment(payment_reference);

        let (ticket_id, tx_ref) = self
            .ledger
            .mint_ticket(event_id, identity_token, payment_id)
            .map_err(|e| map_event_error(e, event_id))?;

        tracing::info!(ticket = %ticket_id, event = %event_id, "ticket issued");

        Ok(IssuedTicket {
            ticket_id,
            event_id,
            tx_ref,
        })
    }
}

/// Lifts ledger rejections the caller can act on into their service-level
/// forms; everything else surfaces as a ledger failure.
fn map_event_error(e: LedgerError, event_id: EventId) -> ServiceError {
    match e {
        LedgerError::EventNotFound(_) => ServiceError::EventNotFound(event_id),
        LedgerError::EventInactive(_) => ServiceError::EventInactive(event_id),
        LedgerError::SoldOut(_) => ServiceError::SoldOut(event_id),
        other => ServiceError::Ledger(other),
    }
}
