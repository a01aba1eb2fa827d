use std::fs;

use tempfile::TempDir;
use turnstile_ledger::{
    JournalLedger, JournalOptions, LedgerError, MemoryLedger, NewEvent, ReadMode, TicketLedger,
};
use turnstile_core::{EventId, IdentityToken, PaymentId, TicketId};

fn sample_event(capacity: u32) -> NewEvent {
    NewEvent {
        name: "Night Market".to_string(),
        location: "Pier 9".to_string(),
        date: 1_767_225_600,
        price: 2_500,
        capacity,
    }
}

fn token(seed: &str) -> IdentityToken {
    let mut s = seed.to_string();
    while s.len() < 43 {
        s.push('A');
    }
    s.truncate(43);
    IdentityToken::new(s)
}

fn payment(seed: &str) -> PaymentId {
    let mut s = seed.to_string();
    while s.len() < 43 {
        s.push('B');
    }
    s.truncate(43);
    PaymentId::new(s)
}

fn exercise_contract(ledger: &dyn TicketLedger) {
    // Unknown ids fail NotFound.
    assert!(matches!(
        ledger.get_event(EventId::new(0)),
        Err(LedgerError::EventNotFound(_))
    ));
    assert!(matches!(
        ledger.get_ticket(TicketId::new(0)),
        Err(LedgerError::TicketNotFound(_))
    ));

    // Events are assigned sequential ids and start active.
    let (e0, _) = ledger.create_event(sample_event(2)).unwrap();
    let (e1, _) = ledger.create_event(sample_event(1)).unwrap();
    assert_eq!(e0, EventId::new(0));
    assert_eq!(e1, EventId::new(1));
    assert_eq!(ledger.total_events().unwrap(), 2);
    assert!(ledger.get_event(e0).unwrap().active);

    // Minting increments tickets_sold and binds the token.
    let (t0, _) = ledger
        .mint_ticket(e0, token("alice"), payment("pay-1"))
        .unwrap();
    assert_eq!(t0, TicketId::new(0));
    assert_eq!(ledger.get_event(e0).unwrap().tickets_sold, 1);
    let ticket = ledger.get_ticket(t0).unwrap();
    assert_eq!(ticket.event_id, e0);
    assert!(!ticket.used);

    // Inactive events refuse to mint but still resolve on lookups.
    ledger.set_event_status(e1, false).unwrap();
    assert!(matches!(
        ledger.mint_ticket(e1, token("bob"), payment("pay-2")),
        Err(LedgerError::EventInactive(_))
    ));
    assert!(ledger.get_event(e1).is_ok());
    ledger.set_event_status(e1, true).unwrap();

    // Capacity is enforced at the storage layer.
    ledger
        .mint_ticket(e1, token("bob"), payment("pay-2"))
        .unwrap();
    assert!(matches!(
        ledger.mint_ticket(e1, token("carol"), payment("pay-3")),
        Err(LedgerError::SoldOut(_))
    ));
    assert_eq!(ledger.get_event(e1).unwrap().tickets_sold, 1);

    // mark_used requires the minted token and is one-way.
    assert!(matches!(
        ledger.mark_used(t0, token("mallory")),
        Err(LedgerError::TokenMismatch(_))
    ));
    ledger.mark_used(t0, token("alice")).unwrap();
    assert!(ledger.get_ticket(t0).unwrap().used);
    assert!(matches!(
        ledger.mark_used(t0, token("alice")),
        Err(LedgerError::AlreadyUsed(_))
    ));

    // user_tickets filters by token.
    let (t2, _) = ledger
        .mint_ticket(e0, token("alice"), payment("pay-4"))
        .unwrap();
    assert_eq!(ledger.user_tickets(&token("alice")).unwrap(), vec![t0, t2]);
    assert!(ledger.user_tickets(&token("nobody")).unwrap().is_empty());
}

#[test]
fn memory_backend_contract() {
    let ledger = MemoryLedger::new();
    exercise_contract(&ledger);
}

#[test]
fn journal_backend_contract() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tickets.tlg");
    let ledger = JournalLedger::open(&path, JournalOptions::default()).unwrap();
    exercise_contract(&ledger);
}

#[test]
fn journal_reopen_replays_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tickets.tlg");

    let (e0, t0) = {
        let ledger = JournalLedger::open(&path, JournalOptions::default()).unwrap();
        let (e0, _) = ledger.create_event(sample_event(5)).unwrap();
        let (t0, _) = ledger
            .mint_ticket(e0, token("alice"), payment("pay-1"))
            .unwrap();
        ledger.mark_used(t0, token("alice")).unwrap();
        (e0, t0)
    };

    let ledger = JournalLedger::open(&path, JournalOptions::default()).unwrap();
    assert_eq!(ledger.total_events().unwrap(), 1);
    let event = ledger.get_event(e0).unwrap();
    assert_eq!(event.tickets_sold, 1);
    let ticket = ledger.get_ticket(t0).unwrap();
    assert!(ticket.used);

    // Rules still hold after replay.
    assert!(matches!(
        ledger.mark_used(t0, token("alice")),
        Err(LedgerError::AlreadyUsed(_))
    ));
}

#[test]
fn journal_strict_mode_rejects_torn_tail() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tickets.tlg");

    {
        let ledger = JournalLedger::open(&path, JournalOptions::default()).unwrap();
        ledger.create_event(sample_event(5)).unwrap();
    }

    let len = fs::metadata(&path).unwrap().len();
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(len - 5).unwrap();
    drop(file);

    assert!(matches!(
        JournalLedger::open(&path, JournalOptions::default()),
        Err(LedgerError::TruncatedFrame { .. })
    ));
}

#[test]
fn journal_permissive_mode_repairs_torn_tail() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tickets.tlg");

    {
        let ledger = JournalLedger::open(&path, JournalOptions::default()).unwrap();
        let (e0, _) = ledger.create_event(sample_event(5)).unwrap();
        ledger
            .mint_ticket(e0, token("alice"), payment("pay-1"))
            .unwrap();
    }

    // Tear the final frame as a crashed writer would.
    let len = fs::metadata(&path).unwrap().len();
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(len - 5).unwrap();
    drop(file);

    let ledger = JournalLedger::open(
        &path,
        JournalOptions {
            sync: false,
            mode: ReadMode::Permissive,
        },
    )
    .unwrap();
    // The torn mint is gone; the event survived and capacity was restored.
    assert_eq!(ledger.total_events().unwrap(), 1);
    assert_eq!(ledger.get_event(EventId::new(0)).unwrap().tickets_sold, 0);

    // Appending after repair lands on a clean frame boundary.
    ledger
        .mint_ticket(EventId::new(0), token("alice"), payment("pay-1"))
        .unwrap();
    drop(ledger);
    let ledger = JournalLedger::open(&path, JournalOptions::default()).unwrap();
    assert_eq!(ledger.get_event(EventId::new(0)).unwrap().tickets_sold, 1);
}

#[test]
fn journal_rejects_foreign_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tickets.tlg");
    fs::write(&path, b"not a ledger journal at all").unwrap();
    assert!(matches!(
        JournalLedger::open(&path, JournalOptions::default()),
        Err(LedgerError::InvalidHeader(_))
    ));
}
