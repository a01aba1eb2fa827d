//! Admin-gated event and ticket operations.

use std::sync::Arc;

use turnstile_core::{EventId, IdentityBinder, IdentityToken, PaymentId, Phone, TicketId, TxRef};
use turnstile_ledger::{LedgerError, NewEvent, TicketLedger};

use crate::errors::ServiceError;
use crate::session::Claims;

/// Outcome of event creation.
#[derive(Debug, Clone)]
pub struct CreatedEvent {
    /// Ledger-assigned event id.
    pub event_id: EventId,
    /// Reference of the finalized write.
    pub tx_ref: TxRef,
}

/// Full ticket detail for support and gate tooling.
#[derive(Debug, Clone)]
pub struct TicketDetails {
    /// Ticket id.
    pub ticket_id: TicketId,
    /// Event id.
    pub event_id: EventId,
    /// Event name.
    pub event_name: String,
    /// Event location.
    pub event_location: String,
    /// Event date as unix seconds.
    pub event_date: u64,
    /// Holder identity binding (opaque).
    pub identity_token: IdentityToken,
    /// Payment proof hash.
    pub payment_id: PaymentId,
    /// Whether the ticket has been consumed.
    pub used: bool,
}

/// Admin operations over the ledger.
pub struct AdminDesk {
    ledger: Arc<dyn TicketLedger>,
    binder: Arc<IdentityBinder>,
}

impl AdminDesk {
    /// Creates an admin desk over the given ledger and binder.
    pub fn new(ledger: Arc<dyn TicketLedger>, binder: Arc<IdentityBinder>) -> Self {
        Self { ledger, binder }
    }

    fn require_admin(claims: &Claims) -> Result<(), ServiceError> {
        if claims.is_admin {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    /// Creates an event. New events start active.
    pub fn create_event(
        &self,
        admin: &Claims,
        event: NewEvent,
    ) -> Result<CreatedEvent, ServiceError> {
        Self::require_admin(admin)?;
        if event.name.is_empty() {
            return Err(ServiceError::Validation("event name required".to_string()));
        }
        if event.location.is_empty() {
            return Err(ServiceError::Validation(
                "event location required".to_string(),
            ));
        }
        if event.capacity == 0 {
            return Err(ServiceError::Validation(
                "event capacity must be greater than zero".to_string(),
            ));
        }
        let (event_id, tx_ref) = self.ledger.create_event(event)?;
        tracing::info!(event = %event_id, "event created");
        Ok(CreatedEvent { event_id, tx_ref })
    }

    /// Opens or closes an event for new sales.
    pub fn set_event_status(
        &self,
        admin: &Claims,
        event_id: EventId,
        active: bool,
    ) -> Result<TxRef, ServiceError> {
        Self::require_admin(admin)?;
        self.ledger
            .set_event_status(event_id, active)
            .map_err(|e| match e {
                LedgerError::EventNotFound(_) => ServiceError::EventNotFound(event_id),
                other => ServiceError::Ledger(other),
            })
    }

    /// Fetches a ticket joined with its event.
    pub fn ticket_details(
        &self,
        admin: &Claims,
        ticket_id: TicketId,
    ) -> Result<TicketDetails, ServiceError> {
        Self::require_admin(admin)?;
        let ticket = self.ledger.get_ticket(ticket_id).map_err(|e| match e {
            LedgerError::TicketNotFound(_) => ServiceError::TicketNotFound(ticket_id),
            other => ServiceError::Ledger(other),
        })?;
        let event = self.ledger.get_event(ticket.event_id)?;
        Ok(TicketDetails {
            ticket_id,
            event_id: ticket.event_id,
            event_name: event.name,
            event_location: event.location,
            event_date: event.date,
            identity_token: ticket.identity_token,
            payment_id: ticket.payment_id,
            used: ticket.used,
        })
    }

    /// Marks a ticket used without a challenge: the manual override for a
    /// gate whose scanner is down. The ledger still enforces ownership
    /// and the one-way transition.
    pub fn admit_direct(
        &self,
        admin: &Claims,
        ticket_id: TicketId,
        phone: &str,
        event_id: EventId,
    ) -> Result<TxRef, ServiceError> {
        Self::require_admin(admin)?;
        let phone =
            Phone::parse(phone).map_err(|e| ServiceError::Validation(e.to_string()))?;
        let token = self.binder.bind(&phone, event_id);
        let tx_ref = self
            .ledger
            .mark_used(ticket_id, token)
            .map_err(|e| match e {
                LedgerError::TicketNotFound(_) => ServiceError::TicketNotFound(ticket_id),
                LedgerError::AlreadyUsed(_) => ServiceError::AlreadyUsed(ticket_id),
                LedgerError::TokenMismatch(_) => ServiceError::OwnershipMismatch,
                other => ServiceError::Ledger(other),
            })?;
        tracing::info!(ticket = %ticket_id, "ticket consumed by manual override");
        Ok(tx_ref)
    }
}
