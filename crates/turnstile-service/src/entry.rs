//! The admission state machine.
//!
//! Per ticket, beyond the ledger's own `used` flag:
//!
//! ```text
//! NoChallenge --scan ok--> Scanned --confirm ok--> Confirmed (used=true)
//!                          Scanned --wrong code--> Scanned   (retry until TTL)
//!                          Scanned --TTL elapsed-> NoChallenge (rescan)
//! Confirmed: terminal
//! ```
//!
//! `scan` is the authorization phase: an admin presents the holder's
//! credential (from a QR payload), ownership is proved against the
//! ticket's identity token, and a fresh single-use code is opened.
//! `confirm` is the consumption phase: the code is taken exactly once and
//! the one-way ledger transition is submitted. The challenge is consumed
//! before the ledger write; if that write then fails, the failure is
//! surfaced distinctly ([`ServiceError::ConfirmNotFinalized`]) and the
//! recovery path is a fresh scan; the ledger did not change, so the
//! retry is safe.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use turnstile_core::{EventId, IdentityBinder, Phone, TicketId, TxRef};
use turnstile_ledger::{LedgerError, TicketLedger};

use crate::challenge::{generate_code, ChallengeRejection, ChallengeStore};
use crate::errors::ServiceError;
use crate::session::{Claims, SessionAuthority};

/// Payload carried by an entry challenge: who was scanned, for which
/// event. Caching the event id avoids a second ledger read at confirm.
#[derive(Debug, Clone)]
pub struct EntryClaim {
    /// Phone of the holder whose credential was scanned.
    pub phone: Phone,
    /// Event the ticket admits to.
    pub event_id: EventId,
}

/// Result of a successful scan: ticket/event detail plus the opened code.
///
/// The code is always present here; whether it is disclosed to the caller
/// is a boundary policy (`reveal_codes`), not a core concern. What the
/// core guarantees is that the code is bound to exactly this
/// ticket-holder-event triple.
#[derive(Debug, Clone)]
pub struct EntryScan {
    /// Scanned ticket.
    pub ticket_id: TicketId,
    /// Event the ticket admits to.
    pub event_id: EventId,
    /// Event name.
    pub event_name: String,
    /// Event location.
    pub event_location: String,
    /// Event date as unix seconds.
    pub event_date: u64,
    /// Holder phone decoded from the scanned credential.
    pub holder_phone: Phone,
    /// Always false on a successful scan; kept for the boundary shape.
    pub used: bool,
    /// The generated single-use code.
    pub code: String,
}

/// Result of a successful confirm: the ticket is now consumed.
#[derive(Debug, Clone)]
pub struct EntryConfirm {
    /// Consumed ticket.
    pub ticket_id: TicketId,
    /// Reference of the finalized mark-used write.
    pub tx_ref: TxRef,
}

/// Two-phase admission verifier.
pub struct EntryVerifier {
    ledger: Arc<dyn TicketLedger>,
    binder: Arc<IdentityBinder>,
    sessions: Arc<dyn SessionAuthority>,
    challenges: Arc<dyn ChallengeStore<TicketId, EntryClaim>>,
    ttl: Duration,
}

impl EntryVerifier {
    /// Creates a verifier; `ttl` bounds the scan→confirm window.
    pub fn new(
        ledger: Arc<dyn TicketLedger>,
        binder: Arc<IdentityBinder>,
        sessions: Arc<dyn SessionAuthority>,
        challenges: Arc<dyn ChallengeStore<TicketId, EntryClaim>>,
        ttl: Duration,
    ) -> Self {
        Self {
            ledger,
            binder,
            sessions,
            challenges,
            ttl,
        }
    }

    /// Phase 1: authorizes a holder and opens an entry challenge.
    ///
    /// Admin-only. `holder_credential` is the holder's own proof of
    /// identity embedded in the QR payload, not the admin's session.
    /// Any prior unconsumed challenge for the ticket is overwritten.
    pub fn scan(
        &self,
        admin: &Claims,
        ticket_id: TicketId,
        holder_credential: &str,
    ) -> Result<EntryScan, ServiceError> {
        if !admin.is_admin {
            return Err(ServiceError::Forbidden);
        }

        let holder = self.sessions.validate(holder_credential)?;

        let ticket = self
            .ledger
            .get_ticket(ticket_id)
            .map_err(|e| map_ticket_error(e, ticket_id))?;

        if !self
            .binder
            .prove_ownership(&holder.phone, ticket.event_id, &ticket.identity_token)
        {
            tracing::debug!(ticket = %ticket_id, "scan rejected: ownership mismatch");
            return Err(ServiceError::OwnershipMismatch);
        }
        if ticket.used {
            return Err(ServiceError::AlreadyUsed(ticket_id));
        }

        let event = self.ledger.get_event(ticket.event_id)?;

        let code = generate_code();
        self.challenges.put(
            ticket_id,
            code.clone(),
            self.ttl,
            EntryClaim {
                phone: holder.phone.clone(),
                event_id: ticket.event_id,
            },
            SystemTime::now(),
        );
        tracing::info!(ticket = %ticket_id, phone = %holder.phone, code = %code, "entry code opened");

        Ok(EntryScan {
            ticket_id,
            event_id: ticket.event_id,
            event_name: event.name,
            event_location: event.location,
            event_date: event.date,
            holder_phone: holder.phone,
            used: ticket.used,
            code,
        })
    }

    /// Phase 2: validates the challenge and consumes the ticket.
    ///
    /// Admin-only. The phone-match check runs strictly after the code
    /// itself is validated, so a wrong code never deletes the challenge
    /// and a phone mismatch never reveals whether the code was right.
    pub fn confirm(
        &self,
        admin: &Claims,
        ticket_id: TicketId,
        phone: &str,
        code: &str,
    ) -> Result<EntryConfirm, ServiceError> {
        if !admin.is_admin {
            return Err(ServiceError::Forbidden);
        }
        let phone = Phone::parse(phone)
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let record = self
            .challenges
            .take_if_valid(&ticket_id, code, SystemTime::now())
            .map_err(|r| match r {
                ChallengeRejection::NotFound => ServiceError::NoPendingEntry,
                ChallengeRejection::Expired => ServiceError::CodeExpired,
                ChallengeRejection::Mismatch => ServiceError::CodeMismatch,
            })?;

        if record.payload.phone != phone {
            return Err(ServiceError::PhoneMismatch);
        }

        // From here the challenge is spent. The ledger write is the sole
        // authority for the used transition; a failure below leaves the
        // ledger unchanged and requires a fresh scan.
        let identity_token = self.binder.bind(&phone, record.payload.event_id);
        let tx_ref = self
            .ledger
            .mark_used(ticket_id, identity_token)
            .map_err(|source| ServiceError::ConfirmNotFinalized { source })?;

        tracing::info!(ticket = %ticket_id, "entry granted, ticket consumed");

        Ok(EntryConfirm { ticket_id, tx_ref })
    }
}

fn map_ticket_error(e: LedgerError, ticket_id: TicketId) -> ServiceError {
    match e {
        LedgerError::TicketNotFound(_) => ServiceError::TicketNotFound(ticket_id),
        other => ServiceError::Ledger(other),
    }
}
