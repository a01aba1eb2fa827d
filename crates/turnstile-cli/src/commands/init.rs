//! Init command implementation.

use std::error::Error;

use turnstile_ledger::TicketLedger;

use crate::commands::open_ledger;

pub fn run(ledger: String) -> Result<(), Box<dyn Error>> {
    let handle = open_ledger(&ledger)?;
    let total = handle.total_events()?;
    if total == 0 {
        println!("Initialized empty ledger at {}", ledger);
    } else {
        println!("Ledger at {} already holds {} event(s)", ledger, total);
    }
    Ok(())
}
