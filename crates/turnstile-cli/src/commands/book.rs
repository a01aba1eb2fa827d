//! Booking commands.

use std::error::Error;

use turnstile_core::{EventId, Phone};
use turnstile_service::{all_bookings, bookings_for_event};

use crate::commands::open_system;
use crate::output;

pub fn book(
    ledger: String,
    event: u64,
    phone: String,
    payment_ref: String,
    secret: Option<String>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let sys = open_system(&ledger, secret)?;
    let phone = Phone::parse(phone)?;
    let issued = sys.issuer.issue(EventId::new(event), &phone, &payment_ref)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ticketId": issued.ticket_id,
                "eventId": issued.event_id,
                "transactionRef": issued.tx_ref,
            })
        );
    } else {
        println!(
            "Booked ticket {} for event {} (tx {})",
            issued.ticket_id, issued.event_id, issued.tx_ref
        );
    }
    Ok(())
}

pub fn bookings(
    ledger: String,
    phone: String,
    event: Option<u64>,
    secret: Option<String>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let sys = open_system(&ledger, secret)?;
    let phone = Phone::parse(phone)?;
    let found = match event {
        Some(event) => {
            bookings_for_event(sys.ledger.as_ref(), &sys.binder, &phone, EventId::new(event))?
        }
        None => all_bookings(sys.ledger.as_ref(), &sys.binder, &phone)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    output::print_booking_header();
    for booking in &found {
        println!("{}", output::format_booking_row(booking));
    }
    Ok(())
}
