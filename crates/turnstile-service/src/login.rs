//! Phone login codes.
//!
//! The login flow shares the challenge component with entry verification
//! and carries the identical consume-once/expiry contract: a code is
//! requested for a phone, then exchanged exactly once for a bearer
//! session credential.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use turnstile_core::Phone;

use crate::challenge::{generate_code, ChallengeRejection, ChallengeStore};
use crate::errors::ServiceError;
use crate::session::{Claims, TokenRegistry};

/// Outcome of a login-code request.
#[derive(Debug, Clone)]
pub struct LoginCodeIssued {
    /// The generated code; boundary layers disclose it only when
    /// `reveal_codes` is configured (it normally leaves via SMS).
    pub code: String,
}

/// A granted session.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    /// Bearer credential for subsequent requests.
    pub token: String,
    /// Phone the session was granted to.
    pub phone: Phone,
    /// Whether the session carries admin privileges.
    pub is_admin: bool,
}

/// Requests and verifies phone login codes.
pub struct LoginFlow {
    codes: Arc<dyn ChallengeStore<Phone, ()>>,
    sessions: Arc<TokenRegistry>,
    admin_phone: Option<Phone>,
    ttl: Duration,
}

impl LoginFlow {
    /// Creates a login flow; `ttl` bounds the request→verify window.
    pub fn new(
        codes: Arc<dyn ChallengeStore<Phone, ()>>,
        sessions: Arc<TokenRegistry>,
        admin_phone: Option<Phone>,
        ttl: Duration,
    ) -> Self {
        Self {
            codes,
            sessions,
            admin_phone,
            ttl,
        }
    }

    /// Generates and stores a login code for `phone`.
    ///
    /// A repeated request overwrites the previous code.
    pub fn request_code(&self, phone: &str) -> Result<LoginCodeIssued, ServiceError> {
        let phone =
            Phone::parse(phone).map_err(|e| ServiceError::Validation(e.to_string()))?;
        let code = generate_code();
        self.codes
            .put(phone.clone(), code.clone(), self.ttl, (), SystemTime::now());
        tracing::info!(phone = %phone, code = %code, "login code issued");
        Ok(LoginCodeIssued { code })
    }

    /// Exchanges a login code for a session credential.
    ///
    /// The code is consumed exactly once; a wrong code leaves it pending
    /// for retry within the TTL.
    pub fn verify_code(&self, phone: &str, code: &str) -> Result<LoginGrant, ServiceError> {
        let phone =
            Phone::parse(phone).map_err(|e| ServiceError::Validation(e.to_string()))?;

        self.codes
            .take_if_valid(&phone, code, SystemTime::now())
            .map_err(|r| match r {
                ChallengeRejection::NotFound => ServiceError::NoPendingLogin,
                ChallengeRejection::Expired => ServiceError::CodeExpired,
                ChallengeRejection::Mismatch => ServiceError::CodeMismatch,
            })?;

        let is_admin = self.admin_phone.as_ref() == Some(&phone);
        let token = self.sessions.issue(
            Claims {
                phone: phone.clone(),
                is_admin,
            },
            SystemTime::now(),
        );
        tracing::info!(phone = %phone, is_admin, "session granted");

        Ok(LoginGrant {
            token,
            phone,
            is_admin,
        })
    }
}
