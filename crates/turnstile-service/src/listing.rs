//! Event and booking listings.
//!
//! Enumeration sweeps are best-effort: a single record's fetch failure is
//! logged and skipped so the overall listing still returns. This is the
//! only place errors are deliberately not propagated.

use serde::{Deserialize, Serialize};

use turnstile_core::{EventId, IdentityBinder, PaymentId, Phone, TicketId};
use turnstile_ledger::TicketLedger;

use crate::errors::ServiceError;

/// Event detail plus derived availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    /// Event id.
    pub event_id: EventId,
    /// Event name.
    pub name: String,
    /// Event location.
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
    /// Remaining capacity.
    pub available_tickets: u32,
}

/// A holder's ticket joined with its event detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
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
    /// Ticket price in the smallest currency unit.
    pub event_price: u64,
    /// Whether the ticket has been consumed.
    pub used: bool,
    /// Payment proof hash.
    pub payment_id: PaymentId,
}

/// Summarizes a single event.
pub fn event_summary(
    ledger: &dyn TicketLedger,
    event_id: EventId,
) -> Result<EventSummary, ServiceError> {
    let event = ledger.get_event(event_id).map_err(|e| match e {
        turnstile_ledger::LedgerError::EventNotFound(_) => ServiceError::EventNotFound(event_id),
        other => ServiceError::Ledger(other),
    })?;
    Ok(EventSummary {
        event_id,
        available_tickets: event.capacity.saturating_sub(event.tickets_sold),
        name: event.name,
        location: event.location,
        date: event.date,
        price: event.price,
        capacity: event.capacity,
        tickets_sold: event.tickets_sold,
        active: event.active,
    })
}

/// Lists all events, skipping records that fail to load.
pub fn list_events(ledger: &dyn TicketLedger) -> Result<Vec<EventSummary>, ServiceError> {
    let total = ledger.total_events()?;
    let mut events = Vec::with_capacity(total as usize);
    for i in 0..total {
        match event_summary(ledger, EventId::new(i)) {
            Ok(summary) => events.push(summary),
            Err(e) => {
                tracing::warn!(event = i, error = %e, "skipping unreadable event record");
            }
        }
    }
    Ok(events)
}

/// Lists a holder's bookings for one event.
pub fn bookings_for_event(
    ledger: &dyn TicketLedger,
    binder: &IdentityBinder,
    phone: &Phone,
    event_id: EventId,
) -> Result<Vec<BookingSummary>, ServiceError> {
    let token = binder.bind(phone, event_id);
    let mut bookings = Vec::new();
    for ticket_id in ledger.user_tickets(&token)? {
        match booking_summary(ledger, ticket_id) {
            Ok(summary) => bookings.push(summary),
            Err(e) => {
                tracing::warn!(ticket = %ticket_id, error = %e, "skipping unreadable ticket record");
            }
        }
    }
    Ok(bookings)
}

/// Lists a holder's bookings across every event.
///
/// The identity token differs per event, so this sweeps each event id and
/// collects matches; a failing event is skipped, not fatal.
pub fn all_bookings(
    ledger: &dyn TicketLedger,
    binder: &IdentityBinder,
    phone: &Phone,
) -> Result<Vec<BookingSummary>, ServiceError> {
    let total = ledger.total_events()?;
    let mut bookings = Vec::new();
    for i in 0..total {
        match bookings_for_event(ledger, binder, phone, EventId::new(i)) {
            Ok(mut found) => bookings.append(&mut found),
            Err(e) => {
                tracing::warn!(event = i, error = %e, "skipping event while sweeping bookings");
            }
        }
    }
    Ok(bookings)
}

fn booking_summary(
    ledger: &dyn TicketLedger,
    ticket_id: TicketId,
) -> Result<BookingSummary, ServiceError> {
    let ticket = ledger.get_ticket(ticket_id)?;
    let event = ledger.get_event(ticket.event_id)?;
    Ok(BookingSummary {
        ticket_id,
        event_id: ticket.event_id,
        event_name: event.name,
        event_location: event.location,
        event_date: event.date,
        event_price: event.price,
        used: ticket.used,
        payment_id: ticket.payment_id,
    })
}
