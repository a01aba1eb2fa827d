//! Event management commands.

use std::error::Error;

use turnstile_core::EventId;
use turnstile_ledger::{NewEvent, TicketLedger};
use turnstile_service::{event_summary, list_events};

use crate::commands::open_ledger;
use crate::output;

/// Parses a date given either as unix seconds or as RFC 3339.
fn parse_date(input: &str) -> Result<u64, Box<dyn Error>> {
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return Ok(input.parse()?);
    }
    let dt = chrono::DateTime::parse_from_rfc3339(input)
        .map_err(|e| format!("invalid date {:?}: {}", input, e))?;
    let ts = dt.timestamp();
    if ts < 0 {
        return Err(format!("date {:?} is before the unix epoch", input).into());
    }
    Ok(ts as u64)
}

pub fn create(
    ledger: String,
    name: String,
    location: String,
    date: String,
    price: u64,
    capacity: u32,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let handle = open_ledger(&ledger)?;
    let date = parse_date(&date)?;
    let (event_id, tx_ref) = handle.create_event(NewEvent {
        name,
        location,
        date,
        price,
        capacity,
    })?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "eventId": event_id, "transactionRef": tx_ref })
        );
    } else {
        println!("Created event {} (tx {})", event_id, tx_ref);
    }
    Ok(())
}

pub fn set_status(ledger: String, event: u64, active: bool) -> Result<(), Box<dyn Error>> {
    let handle = open_ledger(&ledger)?;
    let event_id = EventId::new(event);
    let tx_ref = handle.set_event_status(event_id, active)?;
    println!(
        "Event {} is now {} (tx {})",
        event_id,
        if active { "open" } else { "closed" },
        tx_ref
    );
    Ok(())
}

pub fn list(ledger: String, json: bool) -> Result<(), Box<dyn Error>> {
    let handle = open_ledger(&ledger)?;
    let events = list_events(handle.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    output::print_event_header();
    for event in &events {
        println!("{}", output::format_event_row(event));
    }
    Ok(())
}

pub fn show(ledger: String, event: u64, json: bool) -> Result<(), Box<dyn Error>> {
    let handle = open_ledger(&ledger)?;
    let summary = event_summary(handle.as_ref(), EventId::new(event))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Event    : {} ({})", summary.name, summary.event_id);
    println!("Location : {}", summary.location);
    println!("Date     : {}", output::format_date(summary.date));
    println!("Price    : {}", summary.price);
    println!(
        "Tickets  : {}/{} sold, {} available",
        summary.tickets_sold, summary.capacity, summary.available_tickets
    );
    println!(
        "Status   : {}",
        if summary.active { "open" } else { "closed" }
    );
    Ok(())
}
