//! Replayable ledger state.
//!
//! `LedgerState::apply` is the single authoritative enforcement point for
//! every transition rule. Both backends route writes through it, and the
//! journal backend rebuilds state by replaying the log through it, so a
//! record that violates the rules can never enter the log and a log that
//! contains one is corrupt.

use turnstile_core::{EventId, IdentityToken, TicketId};

use crate::error::LedgerError;
use crate::records::{EventRecord, LedgerOp, TicketRecord};

/// Outcome of applying an operation, carrying any assigned id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Applied {
    /// An event was created with this id.
    Event(EventId),
    /// A ticket was minted with this id.
    Ticket(TicketId),
    /// A record was mutated in place.
    Mutated,
}

/// Full ledger state derived from the operation log.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    events: Vec<EventRecord>,
    tickets: Vec<TicketRecord>,
    /// Number of operations applied; doubles as the next log position.
    ops_applied: u64,
}

impl LedgerState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Next log position (sequence number of the op about to be applied).
    pub(crate) fn next_seq(&self) -> u64 {
        self.ops_applied
    }

    /// Validates one operation against the current state without applying.
    ///
    /// Used by the journal backend to reject an operation before its bytes
    /// reach the log; `apply` performs the same checks again.
    pub(crate) fn check(&self, op: &LedgerOp) -> Result<(), LedgerError> {
        match op {
            LedgerOp::EventCreated(_) => Ok(()),
            LedgerOp::EventStatusSet { event_id, .. } => self.event(*event_id).map(|_| ()),
            LedgerOp::TicketMinted { event_id, .. } => {
                let event = self.event(*event_id)?;
                if !event.active {
                    return Err(LedgerError::EventInactive(*event_id));
                }
                if event.tickets_sold >= event.capacity {
                    return Err(LedgerError::SoldOut(*event_id));
                }
                Ok(())
            }
            LedgerOp::TicketUsed {
                ticket_id,
                identity_token,
            } => {
                let ticket = self.ticket(*ticket_id)?;
                if ticket.used {
                    return Err(LedgerError::AlreadyUsed(*ticket_id));
                }
                if &ticket.identity_token != identity_token {
                    return Err(LedgerError::TokenMismatch(*ticket_id));
                }
                Ok(())
            }
        }
    }

    /// Validates and applies one operation.
    ///
    /// On error the state is unchanged.
    pub(crate) fn apply(&mut self, op: &LedgerOp) -> Result<Applied, LedgerError> {
        let applied = match op {
            LedgerOp::EventCreated(event) => {
                let event_id = EventId::new(self.events.len() as u64);
                self.events.push(EventRecord {
                    name: event.name.clone(),
                    location: event.location.clone(),
                    date: event.date,
                    price: event.price,
                    capacity: event.capacity,
                    tickets_sold: 0,
                    active: true,
                });
                Applied::Event(event_id)
            }
            LedgerOp::EventStatusSet { event_id, active } => {
                let event = self.event_mut(*event_id)?;
                event.active = *active;
                Applied::Mutated
            }
            LedgerOp::TicketMinted {
                event_id,
                identity_token,
                payment_id,
            } => {
                let id = *event_id;
                let event = self.event_mut(id)?;
                if !event.active {
                    return Err(LedgerError::EventInactive(id));
                }
                if event.tickets_sold >= event.capacity {
                    return Err(LedgerError::SoldOut(id));
                }
                // Guarded above; capacity is a u32 so this cannot wrap.
                event.tickets_sold += 1;
                let ticket_id = TicketId::new(self.tickets.len() as u64);
                self.tickets.push(TicketRecord {
                    event_id: id,
                    identity_token: identity_token.clone(),
                    payment_id: payment_id.clone(),
                    used: false,
                });
                Applied::Ticket(ticket_id)
            }
            LedgerOp::TicketUsed {
                ticket_id,
                identity_token,
            } => {
                let id = *ticket_id;
                let ticket = self
                    .tickets
                    .get_mut(id.value() as usize)
                    .ok_or(LedgerError::TicketNotFound(id))?;
                if ticket.used {
                    return Err(LedgerError::AlreadyUsed(id));
                }
                if &ticket.identity_token != identity_token {
                    return Err(LedgerError::TokenMismatch(id));
                }
                ticket.used = true;
                Applied::Mutated
            }
        };
        self.ops_applied += 1;
        Ok(applied)
    }

    pub(crate) fn event(&self, id: EventId) -> Result<&EventRecord, LedgerError> {
        self.events
            .get(id.value() as usize)
            .ok_or(LedgerError::EventNotFound(id))
    }

    fn event_mut(&mut self, id: EventId) -> Result<&mut EventRecord, LedgerError> {
        self.events
            .get_mut(id.value() as usize)
            .ok_or(LedgerError::EventNotFound(id))
    }

    pub(crate) fn ticket(&self, id: TicketId) -> Result<&TicketRecord, LedgerError> {
        self.tickets
            .get(id.value() as usize)
            .ok_or(LedgerError::TicketNotFound(id))
    }

    pub(crate) fn total_events(&self) -> u64 {
        self.events.len() as u64
    }

    /// Tickets bound to the given identity token, in mint order.
    pub(crate) fn user_tickets(&self, token: &IdentityToken) -> Vec<TicketId> {
        self.tickets
            .iter()
            .enumerate()
            .filter(|(_, t)| &t.identity_token == token)
            .map(|(i, _)| TicketId::new(i as u64))
            .collect()
    }
}
