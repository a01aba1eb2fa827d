//! Time-boxed, single-use challenge codes.
//!
//! A challenge is a short secret bound to a key (a phone for login, a
//! ticket for entry) that is valid until its expiry and may be consumed
//! exactly once. Time is injected explicitly so expiry behavior is
//! testable without sleeping; production callers pass
//! `SystemTime::now()`.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use rand::Rng;
use thiserror::Error;

/// A stored challenge: code, absolute expiry, and caller payload.
#[derive(Debug, Clone)]
pub struct Challenge<P> {
    /// The secret code the caller must present.
    pub code: String,
    /// Absolute expiry timestamp.
    pub expires_at: SystemTime,
    /// Caller-defined payload carried alongside the code.
    pub payload: P,
}

/// Why a `take_if_valid` call was rejected.
///
/// The three cases are deliberately distinct: callers word their messages
/// differently for each, and only `Expired` removes the record.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeRejection {
    /// No challenge is pending for the key.
    #[error("no pending challenge")]
    NotFound,
    /// The challenge existed but its TTL elapsed; it has been removed.
    #[error("challenge expired")]
    Expired,
    /// The supplied code is wrong; the challenge remains pending.
    #[error("invalid code")]
    Mismatch,
}

/// Keyed store of single-use challenge codes.
///
/// Operations on a given key are serializable with respect to each other;
/// under a race between two consumers of the same key, exactly one
/// receives the record.
pub trait ChallengeStore<K, P>: Send + Sync {
    /// Stores a challenge for `key`, unconditionally overwriting any
    /// existing record. Never fails.
    fn put(&self, key: K, code: String, ttl: Duration, payload: P, now: SystemTime);

    /// Reads the challenge for `key` without consuming it.
    ///
    /// Expiry is not enforced here; callers that peek must check
    /// `expires_at` themselves.
    fn peek(&self, key: &K) -> Option<Challenge<P>>;

    /// Atomically checks existence, expiry, and code equality.
    ///
    /// On success the record is removed and returned; no other caller can
    /// obtain it again. On `Expired` the record is removed. On `Mismatch`
    /// the record is left untouched, so the caller may retry within the
    /// TTL window.
    fn take_if_valid(
        &self,
        key: &K,
        code: &str,
        now: SystemTime,
    ) -> Result<Challenge<P>, ChallengeRejection>;
}

/// In-memory mutex-guarded challenge store, the default backend.
///
/// ```rust
/// use std::time::{Duration, SystemTime};
/// use turnstile_service::{ChallengeRejection, ChallengeStore, MemoryChallengeStore};
///
/// let store: MemoryChallengeStore<u64, ()> = MemoryChallengeStore::new();
/// let now = SystemTime::now();
/// store.put(7, "123456".to_string(), Duration::from_secs(300), (), now);
/// assert_eq!(
///     store.take_if_valid(&7, "000000", now).unwrap_err(),
///     ChallengeRejection::Mismatch
/// );
/// // The wrong attempt did not destroy the record.
/// assert!(store.take_if_valid(&7, "123456", now).is_ok());
/// // ...but consumption did.
/// assert_eq!(
///     store.take_if_valid(&7, "123456", now).unwrap_err(),
///     ChallengeRejection::NotFound
/// );
/// ```
#[derive(Debug, Default)]
pub struct MemoryChallengeStore<K, P> {
    entries: Mutex<HashMap<K, Challenge<P>>>,
}

impl<K, P> MemoryChallengeStore<K, P> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, P> ChallengeStore<K, P> for MemoryChallengeStore<K, P>
where
    K: Eq + Hash + Clone + Send + Sync,
    P: Clone + Send + Sync,
{
    fn put(&self, key: K, code: String, ttl: Duration, payload: P, now: SystemTime) {
        let mut entries = self.entries.lock().expect("challenge lock poisoned");
        entries.insert(
            key,
            Challenge {
                code,
                expires_at: now + ttl,
                payload,
            },
        );
    }

    fn peek(&self, key: &K) -> Option<Challenge<P>> {
        let entries = self.entries.lock().expect("challenge lock poisoned");
        entries.get(key).cloned()
    }

    fn take_if_valid(
        &self,
        key: &K,
        code: &str,
        now: SystemTime,
    ) -> Result<Challenge<P>, ChallengeRejection> {
        let mut entries = self.entries.lock().expect("challenge lock poisoned");
        let challenge = entries.get(key).ok_or(ChallengeRejection::NotFound)?;
        if now > challenge.expires_at {
            entries.remove(key);
            return Err(ChallengeRejection::Expired);
        }
        if challenge.code != code {
            return Err(ChallengeRejection::Mismatch);
        }
        Ok(entries.remove(key).expect("entry present under lock"))
    }
}

/// Generates a fresh six-digit numeric code.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}
