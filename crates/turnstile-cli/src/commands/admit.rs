//! Admit command implementation.
//!
//! Runs the full two-phase admission against the ledger: a holder session
//! is issued for the phone, the ticket is scanned (opening a single-use
//! code), and the code is confirmed. `--direct` is the manual override
//! for a gate whose scanner is down; the ledger still enforces ownership
//! and the one-way used transition either way.

use std::error::Error;
use std::time::SystemTime;

use turnstile_core::{Phone, TicketId};
use turnstile_ledger::TicketLedger;
use turnstile_service::Claims;

use crate::commands::{open_system, operator_claims};
use crate::output;

pub fn run(
    ledger: String,
    ticket: u64,
    phone: String,
    direct: bool,
    secret: Option<String>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let sys = open_system(&ledger, secret)?;
    let ticket_id = TicketId::new(ticket);
    let operator = operator_claims();
    let holder_phone = Phone::parse(phone)?;

    if direct {
        let record = sys.ledger.get_ticket(ticket_id)?;
        let tx_ref = sys.admin.admit_direct(
            &operator,
            ticket_id,
            holder_phone.as_str(),
            record.event_id,
        )?;
        if json {
            println!(
                "{}",
                serde_json::json!({ "ticketId": ticket_id, "transactionRef": tx_ref })
            );
        } else {
            println!("Admitted ticket {} by override (tx {})", ticket_id, tx_ref);
        }
        return Ok(());
    }

    let credential = sys.sessions.issue(
        Claims {
            phone: holder_phone.clone(),
            is_admin: false,
        },
        SystemTime::now(),
    );

    let scan = sys.entry.scan(&operator, ticket_id, &credential)?;
    if !json {
        println!(
            "Scanned ticket {} for {} at {} ({})",
            scan.ticket_id,
            scan.event_name,
            output::format_date(scan.event_date),
            scan.event_location
        );
        println!("Holder {} code {}", scan.holder_phone, scan.code);
    }

    let confirm = sys
        .entry
        .confirm(&operator, ticket_id, holder_phone.as_str(), &scan.code)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ticketId": confirm.ticket_id,
                "transactionRef": confirm.tx_ref,
            })
        );
    } else {
        println!(
            "Entry granted, ticket {} consumed (tx {})",
            confirm.ticket_id, confirm.tx_ref
        );
    }
    Ok(())
}
