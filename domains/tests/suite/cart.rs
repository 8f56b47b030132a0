//! Cart lifecycle scenarios

use std::cell::Cell;

use statecraft_core::{ContextKey, pipe_ok, pipe_result_with_context};
use statecraft_domains::cart::{
    CartError, Item, OpenCart, OpenCartHandlers, add_item, create_cart, pay, remove_item,
};

use crate::common::init_tracing;

fn item(id: &str, price: u64) -> Item {
    Item::new(id, price).expect("test fixture must be a valid item")
}

#[test]
fn cart_is_filled_trimmed_and_paid() {
    init_tracing();

    let result = pipe_ok::<_, CartError>(create_cart())
        .flat_map(|cart| add_item(cart, item("1", 100)))
        .flat_map(|cart| add_item(cart, item("2", 25)))
        .flat_map(|cart| remove_item(cart, "1"))
        .flat_map(pay)
        .into_result();

    let paid = result.expect("checkout should succeed");
    assert_eq!(paid.tag(), "Paid");
    let ids: Vec<&str> = paid.value().items.iter().map(Item::id).collect();
    assert_eq!(ids, vec!["2"]);
    assert_eq!(paid.value().total, 25);
}

#[test]
fn duplicate_item_short_circuits_the_rest_of_the_chain() {
    init_tracing();
    let later_steps = Cell::new(0);

    let result = pipe_ok::<_, CartError>(create_cart())
        .flat_map(|cart| add_item(cart, item("1", 100)))
        .flat_map(|cart| add_item(cart, item("1", 100)))
        .tap(|_| later_steps.set(later_steps.get() + 1))
        .flat_map(|cart| {
            later_steps.set(later_steps.get() + 1);
            add_item(cart, item("3", 5))
        })
        .map(|cart| {
            later_steps.set(later_steps.get() + 1);
            cart
        })
        .flat_map(|cart| {
            later_steps.set(later_steps.get() + 1);
            pay(cart)
        })
        .into_result();

    let err = result.unwrap_err();
    assert_eq!(err.code(), "ItemAlreadyInCart");
    assert_eq!(err, CartError::ItemAlreadyInCart { id: "1".to_owned() });
    assert_eq!(later_steps.get(), 0);
}

#[test]
fn discount_stored_early_is_read_at_payment() {
    const DISCOUNT: ContextKey<u64> = ContextKey::new("discount");

    let due = pipe_result_with_context(Ok::<_, CartError>(create_cart()))
        .set_context(|_, ctx| ctx.set(DISCOUNT, 10))
        .flat_map(|cart, _| add_item(cart, item("1", 100)))
        .flat_map(|cart, _| add_item(cart, item("2", 30)))
        .flat_map(|cart, _| pay(cart))
        .map(|paid, ctx| paid.value().total - ctx.get(DISCOUNT).copied().unwrap_or(0))
        .into_result();

    assert_eq!(due, Ok(120));
}

#[test]
fn open_cart_dispatch_matches_its_state() {
    let empty = create_cart();
    let active: OpenCart = add_item(create_cart(), item("1", 1)).unwrap().into();

    for cart in [empty, active] {
        let expected = cart.tag();
        let calls = Cell::new(0);
        let seen = cart.match_tag(OpenCartHandlers {
            empty: Box::new(|c| {
                calls.set(calls.get() + 1);
                c.tag()
            }),
            active: Box::new(|c| {
                calls.set(calls.get() + 1);
                c.tag()
            }),
        });
        assert_eq!(seen, expected);
        assert_eq!(calls.get(), 1);
    }
}
