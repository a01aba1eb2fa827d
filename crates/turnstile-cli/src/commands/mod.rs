//! Command implementations.

pub mod admit;
pub mod book;
pub mod events;
pub mod init;
pub mod inspect;

use std::error::Error;
use std::sync::Arc;

use turnstile_core::Phone;
use turnstile_ledger::{JournalLedger, JournalOptions, TicketLedger};
use turnstile_service::{Claims, ServiceConfig, System};

/// Opens the ledger journal at `path`, creating it if missing.
pub fn open_ledger(path: &str) -> Result<Arc<dyn TicketLedger>, Box<dyn Error>> {
    let ledger = JournalLedger::open(path, JournalOptions::default())
        .map_err(|e| format!("failed to open ledger {}: {}", path, e))?;
    Ok(Arc::new(ledger))
}

/// Resolves the identity binding secret from the flag or environment.
pub fn resolve_secret(flag: Option<String>) -> Result<String, Box<dyn Error>> {
    flag.or_else(|| std::env::var("TURNSTILE_SECRET").ok())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "binding secret required: pass --secret or set TURNSTILE_SECRET".into())
}

/// Builds a full service over the journal ledger; codes are revealed
/// because the operator terminal is the delivery channel here.
pub fn open_system(path: &str, secret: Option<String>) -> Result<System, Box<dyn Error>> {
    let mut config = ServiceConfig::new(resolve_secret(secret)?);
    config.reveal_codes = true;
    Ok(System::new(&config, open_ledger(path)?))
}

/// Claims for the locally trusted operator running this process.
pub fn operator_claims() -> Claims {
    Claims {
        phone: Phone::parse("0000000000").expect("operator phone is well-formed"),
        is_admin: true,
    }
}
