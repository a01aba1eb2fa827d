//! Integration tests driving the built binary over a temp ledger.

use std::process::Command;

use tempfile::TempDir;

const SECRET: &str = "integration-secret";

fn turnstile(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_turnstile"))
        .args(args)
        .env("TURNSTILE_SECRET", SECRET)
        .output()
        .expect("failed to run turnstile binary")
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn end_to_end_booking_and_admission() {
    let dir = TempDir::new().unwrap();
    let ledger = dir.path().join("tickets.tlg");
    let ledger = ledger.to_str().unwrap();

    let out = turnstile(&["init", ledger]);
    assert!(out.status.success(), "init failed: {}", stderr(&out));

    let out = turnstile(&[
        "create-event",
        ledger,
        "--name",
        "Night Market",
        "--location",
        "Pier 9",
        "--date",
        "2026-01-01T20:00:00Z",
        "--price",
        "2500",
        "--capacity",
        "2",
        "--json",
    ]);
    assert!(out.status.success(), "create-event failed: {}", stderr(&out));
    let created: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(created["eventId"], 0);

    let out = turnstile(&["events", ledger]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Night Market"));
    assert!(stdout(&out).contains("open"));

    let out = turnstile(&[
        "book",
        ledger,
        "--event",
        "0",
        "--phone",
        "9876543210",
        "--payment-ref",
        "UPI-1",
        "--json",
    ]);
    assert!(out.status.success(), "book failed: {}", stderr(&out));
    let booked: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(booked["ticketId"], 0);

    let out = turnstile(&["bookings", ledger, "--phone", "9876543210"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Night Market"));

    let out = turnstile(&["inspect", ledger, "0", "--json"]);
    assert!(out.status.success());
    let details: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(details["used"], false);

    // Two-phase admission in one process: scan opens a code, confirm consumes it.
    let out = turnstile(&["admit", ledger, "0", "--phone", "9876543210", "--json"]);
    assert!(out.status.success(), "admit failed: {}", stderr(&out));
    let admitted: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(admitted["ticketId"], 0);

    let out = turnstile(&["inspect", ledger, "0", "--json"]);
    let details: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(details["used"], true);

    // The used transition is terminal across invocations.
    let out = turnstile(&["admit", ledger, "0", "--phone", "9876543210"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("already been used"));
}

#[test]
fn direct_override_and_status_gate() {
    let dir = TempDir::new().unwrap();
    let ledger = dir.path().join("tickets.tlg");
    let ledger = ledger.to_str().unwrap();

    turnstile(&[
        "create-event",
        ledger,
        "--name",
        "Harbor Run",
        "--location",
        "Quay 3",
        "--date",
        "1767225600",
        "--price",
        "1000",
        "--capacity",
        "10",
    ]);

    let out = turnstile(&[
        "book",
        ledger,
        "--event",
        "0",
        "--phone",
        "9876543210",
        "--payment-ref",
        "UPI-2",
        "--json",
    ]);
    assert!(out.status.success(), "book failed: {}", stderr(&out));

    // Closing the event blocks further sales.
    let out = turnstile(&["set-status", ledger, "0", "--active", "false"]);
    assert!(out.status.success(), "set-status failed: {}", stderr(&out));
    let out = turnstile(&[
        "book",
        ledger,
        "--event",
        "0",
        "--phone",
        "9876543211",
        "--payment-ref",
        "UPI-3",
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("not active"));

    // The override admits without a scan; a second attempt is rejected.
    let out = turnstile(&["admit", ledger, "0", "--phone", "9876543210", "--direct"]);
    assert!(out.status.success(), "direct admit failed: {}", stderr(&out));
    let out = turnstile(&["admit", ledger, "0", "--phone", "9876543210", "--direct"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("already been used"));
}

#[test]
fn booking_requires_the_secret() {
    let dir = TempDir::new().unwrap();
    let ledger = dir.path().join("tickets.tlg");
    let ledger = ledger.to_str().unwrap();

    turnstile(&[
        "create-event",
        ledger,
        "--name",
        "Harbor Run",
        "--location",
        "Quay 3",
        "--date",
        "1767225600",
        "--price",
        "1000",
        "--capacity",
        "10",
    ]);

    let out = Command::new(env!("CARGO_BIN_EXE_turnstile"))
        .args([
            "book",
            ledger,
            "--event",
            "0",
            "--phone",
            "9876543210",
            "--payment-ref",
            "UPI-1",
        ])
        .env_remove("TURNSTILE_SECRET")
        .output()
        .expect("failed to run turnstile binary");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("TURNSTILE_SECRET"));
}
