//! Package lifecycle scenarios

use std::cell::RefCell;

use statecraft_core::pipe_result;
use statecraft_domains::package::{
    DeliveredPackage, PackageError, PackageState, PackageStateHandlers, ShippedPackage,
    UnshippedPackage, create_unshipped, deliver, ship,
};

use crate::common::init_tracing;

#[test]
fn unshipped_package_is_shipped_then_delivered() {
    init_tracing();

    let result = pipe_result(create_unshipped("1"))
        .widen_error::<PackageError>()
        .flat_map(|package| ship(package, "TRK0001"))
        .map(deliver)
        .into_result();

    let delivered = result.expect("lifecycle should succeed");
    assert_eq!(delivered.tag(), "Delivered");
    assert_eq!(delivered.value().id.as_str(), "1");
}

#[test]
fn invalid_id_stops_the_lifecycle_before_shipping() {
    init_tracing();
    let shipped = RefCell::new(Vec::new());

    let result = pipe_result(create_unshipped("  "))
        .widen_error::<PackageError>()
        .flat_map(|package| ship(package, "TRK0001"))
        .tap(|package| shipped.borrow_mut().push(package.value().id.clone()))
        .map(deliver)
        .into_result();

    assert!(matches!(result, Err(PackageError::InvalidId(_))));
    assert!(shipped.borrow().is_empty());
}

#[test]
fn every_state_dispatches_to_its_own_handler() {
    let unshipped = create_unshipped("4").unwrap();
    let shipped = ship(unshipped.clone(), "TRK0004").unwrap();
    let delivered = deliver(shipped.clone());
    let states = [
        PackageState::from(unshipped),
        PackageState::from(shipped),
        PackageState::from(delivered),
    ];

    for state in states {
        let expected = state.tag();
        let invoked = RefCell::new(Vec::new());
        state.match_tag(PackageStateHandlers {
            unshipped: Box::new(|p| invoked.borrow_mut().push(p.tag())),
            shipped: Box::new(|p| invoked.borrow_mut().push(p.tag())),
            delivered: Box::new(|p| invoked.borrow_mut().push(p.tag())),
        });
        assert_eq!(invoked.into_inner(), vec![expected]);
    }
}

#[test]
fn delivered_package_serializes_with_its_tag() {
    let delivered = deliver(ship(create_unshipped("1").unwrap(), "trk0001").unwrap());

    let json = serde_json::to_value(&delivered).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "tag": "Delivered",
            "value": { "id": "1", "tracking": "TRK0001" }
        })
    );

    let back: DeliveredPackage = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(back, delivered);
    assert!(serde_json::from_value::<ShippedPackage>(json).is_err());
}

#[test]
fn empty_id_is_rejected_on_deserialize() {
    let json = serde_json::json!({ "tag": "Unshipped", "value": "" });
    assert!(serde_json::from_value::<UnshippedPackage>(json).is_err());
}
