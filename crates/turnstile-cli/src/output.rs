//! Output formatting utilities.

use turnstile_service::{BookingSummary, EventSummary};

/// Formats unix seconds as a human-readable UTC timestamp.
pub fn format_date(secs: u64) -> String {
    match chrono::DateTime::from_timestamp(secs as i64, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => secs.to_string(),
    }
}

/// Prints the event table header.
pub fn print_event_header() {
    println!(
        "{:>6} {:<24} {:<18} {:<20} {:>8} {:>6}/{:<6} {}",
        "ID", "NAME", "LOCATION", "DATE", "PRICE", "SOLD", "CAP", "STATUS"
    );
    println!("{}", "-".repeat(100));
}

/// Formats an event as a table row.
pub fn format_event_row(event: &EventSummary) -> String {
    format!(
        "{:>6} {:<24} {:<18} {:<20} {:>8} {:>6}/{:<6} {}",
        event.event_id,
        truncate(&event.name, 24),
        truncate(&event.location, 18),
        format_date(event.date),
        event.price,
        event.tickets_sold,
        event.capacity,
        if event.active { "open" } else { "closed" }
    )
}

/// Prints the booking table header.
pub fn print_booking_header() {
    println!(
        "{:>8} {:>6} {:<24} {:<20} {}",
        "TICKET", "EVENT", "NAME", "DATE", "USED"
    );
    println!("{}", "-".repeat(72));
}

/// Formats a booking as a table row.
pub fn format_booking_row(booking: &BookingSummary) -> String {
    format!(
        "{:>8} {:>6} {:<24} {:<20} {}",
        booking.ticket_id,
        booking.event_id,
        truncate(&booking.event_name, 24),
        format_date(booking.event_date),
        if booking.used { "yes" } else { "no" }
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
