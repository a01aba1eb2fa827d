use turnstile_core::{hash_payment, EventId, IdentityBinder, IdentityToken, Phone};

fn phone(s: &str) -> Phone {
    Phone::parse(s).unwrap()
}

#[test]
fn bind_is_deterministic() {
    let binder = IdentityBinder::new("secret");
    let a = binder.bind(&phone("9876543210"), EventId::new(0));
    let b = binder.bind(&phone("9876543210"), EventId::new(0));
    assert_eq!(a, b);
}

#[test]
fn bind_separates_events() {
    let binder = IdentityBinder::new("secret");
    let a = binder.bind(&phone("9876543210"), EventId::new(0));
    let b = binder.bind(&phone("9876543210"), EventId::new(1));
    assert_ne!(a, b);
}

#[test]
fn bind_separates_phones() {
    let binder = IdentityBinder::new("secret");
    let a = binder.bind(&phone("9876543210"), EventId::new(0));
    let b = binder.bind(&phone("9876543211"), EventId::new(0));
    assert_ne!(a, b);
}

#[test]
fn bind_separates_secrets() {
    let a = IdentityBinder::new("secret-a").bind(&phone("9876543210"), EventId::new(0));
    let b = IdentityBinder::new("secret-b").bind(&phone("9876543210"), EventId::new(0));
    assert_ne!(a, b);
}

#[test]
fn tokens_are_well_formed() {
    let binder = IdentityBinder::new("secret");
    let token = binder.bind(&phone("9876543210"), EventId::new(42));
    // 32 bytes of SHA-256 encode to 43 base64url chars, no padding.
    assert!(IdentityToken::parse(token.as_str()).is_ok());
}

#[test]
fn prove_ownership_accepts_and_rejects() {
    let binder = IdentityBinder::new("secret");
    let token = binder.bind(&phone("9876543210"), EventId::new(5));
    assert!(binder.prove_ownership(&phone("9876543210"), EventId::new(5), &token));
    assert!(!binder.prove_ownership(&phone("9876543211"), EventId::new(5), &token));
    assert!(!binder.prove_ownership(&phone("9876543210"), EventId::new(6), &token));
}

#[test]
fn payment_hash_is_deterministic_and_separated() {
    let a = hash_payment("UPI-2024-0001");
    let b = hash_payment("UPI-2024-0001");
    let c = hash_payment("UPI-2024-0002");
    assert_eq!(a, b);
    assert_ne!(a, c);
}
