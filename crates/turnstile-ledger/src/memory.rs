//! In-memory ledger backend.

use std::sync::Mutex;

use turnstile_core::{EventId, IdentityToken, PaymentId, TicketId, TxRef};

use crate::error::LedgerError;
use crate::records::{EventRecord, LedgerOp, NewEvent, TicketRecord};
use crate::state::{Applied, LedgerState};
use crate::traits::TicketLedger;

/// Mutex-guarded in-memory ledger.
///
/// The reference backend for tests and single-process embedding. Writes
/// are finalized the moment the lock is released; conflicting writes to
/// the same record serialize on the lock and the loser is rejected by the
/// transition rules.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    inner: Mutex<LedgerState>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn submit(&self, op: LedgerOp) -> Result<(Applied, TxRef), LedgerError> {
        let mut state = self.inner.lock().expect("ledger lock poisoned");
        let tx_ref = op.tx_ref(state.next_seq())?;
        let applied = state.apply(&op)?;
        Ok((applied, tx_ref))
    }
}

impl TicketLedger for MemoryLedger {
    fn get_event(&self, id: EventId) -> Result<EventRecord, LedgerError> {
        let state = self.inner.lock().expect("ledger lock poisoned");
        state.event(id).cloned()
    }

    fn get_ticket(&self, id: TicketId) -> Result<TicketRecord, LedgerError> {
        let state = self.inner.lock().expect("ledger lock poisoned");
        state.ticket(id).cloned()
    }

    fn create_event(&self, event: NewEvent) -> Result<(EventId, TxRef), LedgerError> {
        match self.submit(LedgerOp::EventCreated(event))? {
            (Applied::Event(id), tx_ref) => Ok((id, tx_ref)),
            _ => unreachable!("event creation yields an event id"),
        }
    }

    fn set_event_status(&self, id: EventId, active: bool) -> Result<TxRef, LedgerError> {
        let (_, tx_ref) = self.submit(LedgerOp::EventStatusSet {
            event_id: id,
            active,
        })?;
        Ok(tx_ref)
    }

    fn mint_ticket(
        &self,
        event_id: EventId,
        identity_token: IdentityToken,
        payment_id: PaymentId,
    ) -> Result<(TicketId, TxRef), LedgerError> {
        match self.submit(LedgerOp::TicketMinted {
            event_id,
            identity_token,
            payment_id,
        })? {
            (Applied::Ticket(id), tx_ref) => Ok((id, tx_ref)),
            _ => unreachable!("minting yields a ticket id"),
        }
    }

    fn mark_used(
        &self,
        ticket_id: TicketId,
        identity_token: IdentityToken,
    ) -> Result<TxRef, LedgerError> {
        let (_, tx_ref) = self.submit(LedgerOp::TicketUsed {
            ticket_id,
            identity_token,
        })?;
        Ok(tx_ref)
    }

    fn total_events(&self) -> Result<u64, LedgerError> {
        let state = self.inner.lock().expect("ledger lock poisoned");
        Ok(state.total_events())
    }

    fn user_tickets(&self, token: &IdentityToken) -> Result<Vec<TicketId>, LedgerError> {
        let state = self.inner.lock().expect("ledger lock poisoned");
        Ok(state.user_tickets(token))
    }
}
