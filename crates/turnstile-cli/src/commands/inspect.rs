//! Inspect command implementation.

use std::error::Error;

use turnstile_core::TicketId;
use turnstile_ledger::TicketLedger;

use crate::commands::open_ledger;
use crate::output;

pub fn run(ledger: String, ticket: u64, json: bool) -> Result<(), Box<dyn Error>> {
    let handle = open_ledger(&ledger)?;
    let ticket_id = TicketId::new(ticket);
    let record = handle.get_ticket(ticket_id)?;
    let event = handle.get_event(record.event_id)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ticketId": ticket_id,
                "eventId": record.event_id,
                "eventName": event.name,
                "eventLocation": event.location,
                "eventDate": event.date,
                "identityToken": record.identity_token,
                "paymentId": record.payment_id,
                "used": record.used,
            })
        );
        return Ok(());
    }

    println!("Ticket   : {}", ticket_id);
    println!("Event    : {} ({})", event.name, record.event_id);
    println!("Date     : {}", output::format_date(event.date));
    println!("Identity : {}", record.identity_token);
    println!("Payment  : {}", record.payment_id);
    println!("Used     : {}", if record.used { "yes" } else { "no" });
    Ok(())
}
