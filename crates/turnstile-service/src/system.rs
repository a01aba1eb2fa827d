//! Dependency-injected composition root.
//!
//! Every shared component is constructed explicitly here and handed to
//! the components that need it; there is no module-level state, so two
//! systems in one process are fully independent and teardown is just
//! dropping the value.

use std::sync::Arc;

use turnstile_core::{IdentityBinder, Phone, TicketId};
use turnstile_ledger::TicketLedger;

use crate::admin::AdminDesk;
use crate::challenge::MemoryChallengeStore;
use crate::config::ServiceConfig;
use crate::entry::{EntryClaim, EntryVerifier};
use crate::issuer::TicketIssuer;
use crate::login::LoginFlow;
use crate::session::TokenRegistry;

/// The assembled ticketing service.
pub struct System {
    /// Identity binder shared by every component.
    pub binder: Arc<IdentityBinder>,
    /// Ledger handle shared by every component.
    pub ledger: Arc<dyn TicketLedger>,
    /// Session registry; also the [`SessionAuthority`] used by `entry`.
    ///
    /// [`SessionAuthority`]: crate::session::SessionAuthority
    pub sessions: Arc<TokenRegistry>,
    /// Phone login flow.
    pub login: LoginFlow,
    /// Ticket minting.
    pub issuer: TicketIssuer,
    /// Two-phase admission.
    pub entry: EntryVerifier,
    /// Admin operations.
    pub admin: AdminDesk,
    /// Whether boundary responses disclose generated codes.
    pub reveal_codes: bool,
}

impl System {
    /// Wires a full service over the given ledger backend.
    pub fn new(config: &ServiceConfig, ledger: Arc<dyn TicketLedger>) -> Self {
        let binder = Arc::new(IdentityBinder::new(config.binding_secret.clone()));
        let sessions = Arc::new(TokenRegistry::new(config.session_ttl()));
        let login_codes = Arc::new(MemoryChallengeStore::<Phone, ()>::new());
        let entry_codes = Arc::new(MemoryChallengeStore::<TicketId, EntryClaim>::new());

        let login = LoginFlow::new(
            login_codes,
            Arc::clone(&sessions),
            config.admin_phone(),
            config.challenge_ttl(),
        );
        let issuer = TicketIssuer::new(Arc::clone(&ledger), Arc::clone(&binder));
        let entry = EntryVerifier::new(
            Arc::clone(&ledger),
            Arc::clone(&binder),
            sessions.clone(),
            entry_codes,
            config.challenge_ttl(),
        );
        let admin = AdminDesk::new(Arc::clone(&ledger), Arc::clone(&binder));

        Self {
            binder,
            ledger,
            sessions,
            login,
            issuer,
            entry,
            admin,
            reveal_codes: config.reveal_codes,
        }
    }
}
