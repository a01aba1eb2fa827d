//! Turnstile CLI - operator interface for ledger and gate operations.

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{admit, book, events, init, inspect};

#[derive(Parser)]
#[command(name = "turnstile")]
#[command(about = "Ticket ledger and gate admission CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty ledger journal
    Init {
        /// Path to ledger journal file
        ledger: String,
    },
    /// Create an event
    CreateEvent {
        /// Path to ledger journal file
        ledger: String,
        /// Event name
        #[arg(long)]
        name: String,
        /// Venue or location
        #[arg(long)]
        location: String,
        /// Date: unix seconds or RFC 3339
        #[arg(long)]
        date: String,
        /// Ticket price in the smallest currency unit
        #[arg(long)]
        price: u64,
        /// Maximum number of tickets
        #[arg(long)]
        capacity: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open or close an event for sales
    SetStatus {
        /// Path to ledger journal file
        ledger: String,
        /// Event id
        event: u64,
        /// New status: true opens sales, false closes them
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
    /// List events
    Events {
        /// Path to ledger journal file
        ledger: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one event
    Show {
        /// Path to ledger journal file
        ledger: String,
        /// Event id
        event: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Book a ticket for a holder
    Book {
        /// Path to ledger journal file
        ledger: String,
        /// Event id
        #[arg(long)]
        event: u64,
        /// Holder phone (10 digits)
        #[arg(long)]
        phone: String,
        /// Opaque payment reference
        #[arg(long)]
        payment_ref: String,
        /// Identity binding secret (or TURNSTILE_SECRET)
        #[arg(long)]
        secret: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List a holder's bookings
    Bookings {
        /// Path to ledger journal file
        ledger: String,
        /// Holder phone (10 digits)
        #[arg(long)]
        phone: String,
        /// Restrict to one event id
        #[arg(long)]
        event: Option<u64>,
        /// Identity binding secret (or TURNSTILE_SECRET)
        #[arg(long)]
        secret: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one ticket with its event
    Inspect {
        /// Path to ledger journal file
        ledger: String,
        /// Ticket id
        ticket: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Admit a holder: scan + confirm, or direct override
    Admit {
        /// Path to ledger journal file
        ledger: String,
        /// Ticket id
        ticket: u64,
        /// Holder phone (10 digits)
        #[arg(long)]
        phone: String,
        /// Skip the challenge and mark used directly
        #[arg(long)]
        direct: bool,
        /// Identity binding secret (or TURNSTILE_SECRET)
        #[arg(long)]
        secret: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { ledger } => init::run(ledger),
        Commands::CreateEvent {
            ledger,
            name,
            location,
            date,
            price,
            capacity,
            json,
        } => events::create(ledger, name, location, date, price, capacity, json),
        Commands::SetStatus {
            ledger,
            event,
            active,
        } => events::set_status(ledger, event, active),
        Commands::Events { ledger, json } => events::list(ledger, json),
        Commands::Show {
            ledger,
            event,
            json,
        } => events::show(ledger, event, json),
        Commands::Book {
            ledger,
            event,
            phone,
            payment_ref,
            secret,
            json,
        } => book::book(ledger, event, phone, payment_ref, secret, json),
        Commands::Bookings {
            ledger,
            phone,
            event,
            secret,
            json,
        } => book::bookings(ledger, phone, event, secret, json),
        Commands::Inspect {
            ledger,
            ticket,
            json,
        } => inspect::run(ledger, ticket, json),
        Commands::Admit {
            ledger,
            ticket,
            phone,
            direct,
            secret,
            json,
        } => admit::run(ledger, ticket, phone, direct, secret, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
