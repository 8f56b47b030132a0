//! Email verification scenarios

use std::cell::Cell;

use statecraft_domains::email::{
    EmailError, EmailState, EmailStateHandlers, VerifiedEmail, register, register_and_verify,
    verify,
};

use crate::common::init_tracing;

#[test]
fn address_is_verified_with_the_issued_code() {
    init_tracing();

    let verified = register_and_verify(" Ada@Example.com", "902114", "902114").unwrap();
    assert_eq!(verified.tag(), "Verified");
    assert_eq!(verified.value().as_str(), "ada@example.com");
}

#[test]
fn wrong_code_leaves_address_unverified() {
    init_tracing();

    assert_eq!(
        register_and_verify("ada@example.com", "902114", "902115"),
        Err(EmailError::CodeMismatch)
    );
}

#[test]
fn verified_email_round_trips_through_json() {
    let verified = verify(register("ada@example.com", "123456").unwrap(), "123456").unwrap();

    let json = serde_json::to_string(&verified).unwrap();
    assert_eq!(json, r#"{"tag":"Verified","value":"ada@example.com"}"#);

    let back: VerifiedEmail = serde_json::from_str(&json).unwrap();
    assert_eq!(back, verified);
}

#[test]
fn malformed_address_is_rejected_on_deserialize() {
    let json = r#"{"tag":"Verified","value":"not-an-address"}"#;
    assert!(serde_json::from_str::<VerifiedEmail>(json).is_err());
}

#[test]
fn email_states_dispatch_to_their_handler() {
    let pending = register("grace@example.org", "246810").unwrap();
    let verified = verify(pending.clone(), "246810").unwrap();

    for state in [EmailState::from(pending), EmailState::from(verified)] {
        let expected = state.tag();
        let unverified_calls = Cell::new(0);
        let verified_calls = Cell::new(0);
        state.match_tag(EmailStateHandlers {
            unverified: Box::new(|_| unverified_calls.set(unverified_calls.get() + 1)),
            verified: Box::new(|_| verified_calls.set(verified_calls.get() + 1)),
        });

        let (expected_unverified, expected_verified) = match expected {
            "Unverified" => (1, 0),
            _ => (0, 1),
        };
        assert_eq!(unverified_calls.get(), expected_unverified);
        assert_eq!(verified_calls.get(), expected_verified);
    }
}
