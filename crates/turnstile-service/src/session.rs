//! Session credentials and identity claims.
//!
//! The core consumes validated claims only: "this request is from phone P"
//! and "this request is from an admin". [`SessionAuthority`] is the trust
//! contract; [`TokenRegistry`] is the in-process reference implementation
//! issuing opaque bearer tokens with a TTL.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use rand::Rng;
use thiserror::Error;
use turnstile_core::Phone;

/// Validated identity claims attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Phone the credential was issued to.
    pub phone: Phone,
    /// Whether the credential carries admin privileges.
    pub is_admin: bool,
}

/// Why a credential was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The credential is unknown or malformed.
    #[error("invalid credential")]
    Invalid,
    /// The credential was valid once but its lifetime elapsed.
    #[error("expired credential")]
    Expired,
}

/// Validates bearer credentials into identity claims.
pub trait SessionAuthority: Send + Sync {
    /// Validates a credential, returning its claims.
    fn validate(&self, credential: &str) -> Result<Claims, SessionError>;
}

struct Session {
    claims: Claims,
    expires_at: SystemTime,
}

/// In-process bearer-token session registry.
///
/// Tokens are 128 bits of randomness, hex-encoded; claims live in memory
/// until the TTL elapses. Expired sessions are dropped on validation.
pub struct TokenRegistry {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
}

impl TokenRegistry {
    /// Creates a registry whose tokens live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Issues a fresh credential for the given claims.
    pub fn issue(&self, claims: Claims, now: SystemTime) -> String {
        let token = format!("{:032x}", rand::thread_rng().gen::<u128>());
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.insert(
            token.clone(),
            Session {
                claims,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    /// Issues a fresh credential carrying the claims of an existing one.
    ///
    /// The old credential stays valid until its own expiry, matching the
    /// usual bearer-refresh behavior.
    pub fn renew(&self, credential: &str, now: SystemTime) -> Result<String, SessionError> {
        let claims = self.validate_at(credential, now)?;
        Ok(self.issue(claims, now))
    }

    /// Validates a credential at an explicit instant.
    pub fn validate_at(&self, credential: &str, now: SystemTime) -> Result<Claims, SessionError> {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        let session = sessions.get(credential).ok_or(SessionError::Invalid)?;
        if now > session.expires_at {
            sessions.remove(credential);
            return Err(SessionError::Expired);
        }
        Ok(session.claims.clone())
    }
}

impl SessionAuthority for TokenRegistry {
    fn validate(&self, credential: &str) -> Result<Claims, SessionError> {
        self.validate_at(credential, SystemTime::now())
    }
}
