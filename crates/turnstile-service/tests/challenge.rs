use std::time::{Duration, SystemTime};

use turnstile_service::{ChallengeRejection, ChallengeStore, MemoryChallengeStore};

const TTL: Duration = Duration::from_secs(300);

fn store() -> MemoryChallengeStore<String, u32> {
    MemoryChallengeStore::new()
}

#[test]
fn wrong_code_never_destroys_the_challenge() {
    let store = store();
    let now = SystemTime::now();
    store.put("k".to_string(), "123456".to_string(), TTL, 7, now);

    for _ in 0..5 {
        assert_eq!(
            store.take_if_valid(&"k".to_string(), "654321", now).unwrap_err(),
            ChallengeRejection::Mismatch
        );
    }

    // After any number of wrong attempts, the correct code still works.
    let taken = store.take_if_valid(&"k".to_string(), "123456", now).unwrap();
    assert_eq!(taken.payload, 7);
}

#[test]
fn consumption_is_exactly_once() {
    let store = store();
    let now = SystemTime::now();
    store.put("k".to_string(), "123456".to_string(), TTL, 0, now);

    assert!(store.take_if_valid(&"k".to_string(), "123456", now).is_ok());
    assert_eq!(
        store.take_if_valid(&"k".to_string(), "123456", now).unwrap_err(),
        ChallengeRejection::NotFound
    );
}

#[test]
fn expiry_removes_the_record() {
    let store = store();
    let now = SystemTime::now();
    store.put("k".to_string(), "123456".to_string(), TTL, 0, now);

    let later = now + TTL + Duration::from_secs(1);
    assert_eq!(
        store
            .take_if_valid(&"k".to_string(), "123456", later)
            .unwrap_err(),
        ChallengeRejection::Expired
    );
    // No residual record: a second attempt is NotFound, even "back in time".
    assert_eq!(
        store.take_if_valid(&"k".to_string(), "123456", now).unwrap_err(),
        ChallengeRejection::NotFound
    );
}

#[test]
fn boundary_instant_is_still_valid() {
    let store = store();
    let now = SystemTime::now();
    store.put("k".to_string(), "123456".to_string(), TTL, 0, now);
    // Exactly at expiry the code is still accepted; only strictly-later is expired.
    assert!(store.take_if_valid(&"k".to_string(), "123456", now + TTL).is_ok());
}

#[test]
fn put_overwrites_any_prior_challenge() {
    let store = store();
    let now = SystemTime::now();
    store.put("k".to_string(), "111111".to_string(), TTL, 1, now);
    store.put("k".to_string(), "222222".to_string(), TTL, 2, now);

    assert_eq!(
        store.take_if_valid(&"k".to_string(), "111111", now).unwrap_err(),
        ChallengeRejection::Mismatch
    );
    let taken = store.take_if_valid(&"k".to_string(), "222222", now).unwrap();
    assert_eq!(taken.payload, 2);
}

#[test]
fn peek_neither_consumes_nor_enforces_expiry() {
    let store = store();
    let now = SystemTime::now();
    store.put("k".to_string(), "123456".to_string(), TTL, 9, now);

    let peeked = store.peek(&"k".to_string()).unwrap();
    assert_eq!(peeked.code, "123456");
    assert_eq!(peeked.payload, 9);
    // Still consumable after peeking.
    assert!(store.take_if_valid(&"k".to_string(), "123456", now).is_ok());

    // peek returns even an expired record; expiry is the caller's check.
    store.put("k".to_string(), "123456".to_string(), TTL, 9, now);
    assert!(store.peek(&"k".to_string()).is_some());
    let later = now + TTL + Duration::from_secs(1);
    let stale = store.peek(&"k".to_string()).unwrap();
    assert!(later > stale.expires_at);
}

#[test]
fn keys_are_independent() {
    let store = store();
    let now = SystemTime::now();
    store.put("a".to_string(), "111111".to_string(), TTL, 1, now);
    store.put("b".to_string(), "222222".to_string(), TTL, 2, now);

    assert!(store.take_if_valid(&"a".to_string(), "111111", now).is_ok());
    // Consuming one key leaves the other untouched.
    let b = store.take_if_valid(&"b".to_string(), "222222", now).unwrap();
    assert_eq!(b.payload, 2);
}
