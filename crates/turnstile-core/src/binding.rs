//! Identity binding with domain-separated hashing.
//!
//! Identity tokens are computed as:
//! `base64url(sha256(domain_separator || phone || event_id_le || secret))`
//! where `secret` is a deployment-wide configuration value. Equal inputs
//! always produce the same token; deployments with different secrets
//! produce unrelated tokens by construction.

use base64::Engine;
use sha2::{Digest, Sha256};

use crate::identifiers::{EventId, IdentityToken, PaymentId, Phone};

/// Domain separator for identity tokens: `b"turnstile:identity:v1\0"`.
const IDENTITY_DOMAIN_SEPARATOR: &[u8] = b"turnstile:identity:v1\0";

/// Domain separator for payment hashes: `b"turnstile:payment:v1\0"`.
const PAYMENT_DOMAIN_SEPARATOR: &[u8] = b"turnstile:payment:v1\0";

/// One-way binder of holder identities to events.
///
/// `bind` is pure and deterministic; there is no stored state beyond the
/// process secret and no error path. Input shape validation (e.g. the
/// phone pattern) is the caller's job, at parse time.
///
/// ```rust
/// use turnstile_core::{EventId, IdentityBinder, Phone};
///
/// let binder = IdentityBinder::new("process-secret");
/// let phone = Phone::parse("9876543210")?;
/// let token = binder.bind(&phone, EventId::new(3));
/// assert!(binder.prove_ownership(&phone, EventId::new(3), &token));
/// assert!(!binder.prove_ownership(&phone, EventId::new(4), &token));
/// # Ok::<(), turnstile_core::ValidationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IdentityBinder {
    secret: String,
}

impl IdentityBinder {
    /// Creates a binder for the given deployment secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Computes the identity token for `(phone, event)`.
    pub fn bind(&self, phone: &Phone, event_id: EventId) -> IdentityToken {
        let mut hasher = Sha256::new();
        hasher.update(IDENTITY_DOMAIN_SEPARATOR);
        hasher.update(phone.as_str().as_bytes());
        hasher.update(event_id.value().to_le_bytes());
        hasher.update(self.secret.as_bytes());
        let bytes = hasher.finalize();
        IdentityToken::new(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Checks a claimed identity against a stored token by recomputation.
    pub fn prove_ownership(
        &self,
        phone: &Phone,
        event_id: EventId,
        stored: &IdentityToken,
    ) -> bool {
        &self.bind(phone, event_id) == stored
    }
}

/// Hashes an opaque payment reference into a `PaymentId`.
///
/// Unlike identity binding this takes no secret; the reference itself is
/// already unguessable and only needs to be fixed-size and opaque on the
/// ledger.
pub fn hash_payment(reference: &str) -> PaymentId {
    let mut hasher = Sha256::new();
    hasher.update(PAYMENT_DOMAIN_SEPARATOR);
    hasher.update(reference.as_bytes());
    let bytes = hasher.finalize();
    PaymentId::new(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}
