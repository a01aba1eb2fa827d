//! Login-code and session flow tests.

use std::sync::Arc;

use turnstile_ledger::MemoryLedger;
use turnstile_service::{ServiceConfig, ServiceError, SessionAuthority, System};

const ADMIN_PHONE: &str = "9999999999";
const HOLDER_PHONE: &str = "9876543210";

fn system() -> System {
    let mut config = ServiceConfig::new("test-secret");
    config.admin_phone = Some(ADMIN_PHONE.to_string());
    System::new(&config, Arc::new(MemoryLedger::new()))
}

#[test]
fn code_exchanges_for_a_working_session() {
    let sys = system();
    let issued = sys.login.request_code(HOLDER_PHONE).unwrap();
    let grant = sys.login.verify_code(HOLDER_PHONE, &issued.code).unwrap();

    assert_eq!(grant.phone.as_str(), HOLDER_PHONE);
    assert!(!grant.is_admin);

    let claims = sys.sessions.validate(&grant.token).unwrap();
    assert_eq!(claims.phone.as_str(), HOLDER_PHONE);
    assert!(!claims.is_admin);
}

#[test]
fn configured_admin_phone_gets_admin_claims() {
    let sys = system();
    let issued = sys.login.request_code(ADMIN_PHONE).unwrap();
    let grant = sys.login.verify_code(ADMIN_PHONE, &issued.code).unwrap();
    assert!(grant.is_admin);
    assert!(sys.sessions.validate(&grant.token).unwrap().is_admin);
}

#[test]
fn wrong_code_is_retryable_and_codes_are_single_use() {
    let sys = system();
    let issued = sys.login.request_code(HOLDER_PHONE).unwrap();

    assert!(matches!(
        sys.login.verify_code(HOLDER_PHONE, "000000"),
        Err(ServiceError::CodeMismatch)
    ));
    // The wrong attempt left the code pending.
    sys.login.verify_code(HOLDER_PHONE, &issued.code).unwrap();
    // Consumption removed it.
    assert!(matches!(
        sys.login.verify_code(HOLDER_PHONE, &issued.code),
        Err(ServiceError::NoPendingLogin)
    ));
}

#[test]
fn repeated_requests_overwrite_the_code() {
    let sys = system();
    let first = sys.login.request_code(HOLDER_PHONE).unwrap();
    let second = sys.login.request_code(HOLDER_PHONE).unwrap();

    if first.code != second.code {
        assert!(matches!(
            sys.login.verify_code(HOLDER_PHONE, &first.code),
            Err(ServiceError::CodeMismatch)
        ));
    }
    sys.login.verify_code(HOLDER_PHONE, &second.code).unwrap();
}

#[test]
fn phone_shape_is_validated_first() {
    let sys = system();
    assert!(matches!(
        sys.login.request_code("12345"),
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        sys.login.verify_code("12345", "123456"),
        Err(ServiceError::Validation(_))
    ));
    // A well-formed phone with no pending code is a distinct case.
    assert!(matches!(
        sys.login.verify_code(HOLDER_PHONE, "123456"),
        Err(ServiceError::NoPendingLogin)
    ));
}
