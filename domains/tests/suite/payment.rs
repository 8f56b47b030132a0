//! Payment construction scenarios

use std::cell::RefCell;

use statecraft_domains::payment::{
    CardNetwork, CardNetworkHandlers, CardNumber, Currency, CurrencyHandlers, PaymentError,
    PaymentMethod, PaymentMethodHandlers, create_card_payment, create_cash_payment,
};

use crate::common::init_tracing;

#[test]
fn visa_payment_is_built_from_raw_input() {
    init_tracing();

    let payment = create_card_payment("4111 1111 1111 1111", 1_999, "usd").unwrap();
    assert_eq!(payment.describe(), "1999 Usd via Visa ending 1111");
}

#[test]
fn unsupported_network_is_reported() {
    assert_eq!(
        create_card_payment("3782 822463 10005", 500, "usd"),
        Err(PaymentError::UnsupportedNetwork)
    );
}

#[test]
fn currency_parser_round_trips_through_dispatch() {
    for code in ["usd", "EUR"] {
        let currency = Currency::parse(code).unwrap();
        let expected = currency.tag();
        let invoked = RefCell::new(Vec::new());
        currency.match_tag(CurrencyHandlers {
            usd: Box::new(|c| invoked.borrow_mut().push(c.tag())),
            eur: Box::new(|c| invoked.borrow_mut().push(c.tag())),
        });
        assert_eq!(invoked.into_inner(), vec![expected]);
    }
}

#[test]
fn network_detection_round_trips_through_dispatch() {
    for raw in ["4012888888881881", "5555555555554444", "2221000000000009"] {
        let network = CardNetwork::detect(&CardNumber::parse(raw).unwrap()).unwrap();
        let expected = network.tag();
        let seen = network.match_tag(CardNetworkHandlers {
            visa: Box::new(|v| *v.value()),
            mastercard: Box::new(|m| *m.value()),
        });
        assert_eq!(seen, expected);
    }
}

#[test]
fn payment_methods_dispatch_to_matching_handler() {
    let methods = [
        create_cash_payment(100, "eur").unwrap().method,
        create_card_payment("5105105105105100", 100, "eur").unwrap().method,
    ];

    for method in methods {
        let expected = method.tag();
        let invoked = RefCell::new(Vec::new());
        method.match_tag(PaymentMethodHandlers {
            cash: Box::new(|c| invoked.borrow_mut().push(c.tag())),
            card: Box::new(|c| invoked.borrow_mut().push(c.tag())),
        });
        assert_eq!(invoked.into_inner(), vec![expected]);
    }
}

#[test]
fn cash_method_is_a_marker() {
    let payment = create_cash_payment(5, "usd").unwrap();
    assert!(matches!(payment.method, PaymentMethod::Cash(cash) if *cash.value() == "Cash"));
}
