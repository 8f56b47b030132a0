//! Shopping cart lifecycle: empty → active → paid.
//!
//! An [`ActiveCart`] always holds at least one item; removing the last one
//! hands back an empty cart. Only an [`OpenCart`] can be paid, and a
//! [`PaidCart`] accepts no further transitions.

use serde::Serialize;
use statecraft_core::{ContextError, ContextKey, pipe_result_with_context};
use statecraft_types::{Tagged, create_tagged, tag, tagged_union};
use thiserror::Error;
use tracing::debug;

// ── Items ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    id: String,
    price: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("item id must not be empty")]
    EmptyId,
    #[error("item price must be greater than zero")]
    Free,
}

impl Item {
    pub fn new(id: impl AsRef<str>, price: u64) -> Result<Self, ItemError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(ItemError::EmptyId);
        }
        if price == 0 {
            return Err(ItemError::Free);
        }
        Ok(Self {
            id: id.to_owned(),
            price,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn price(&self) -> u64 {
        self.price
    }
}

// ── States ───────────────────────────────────────────────────

/// Items of an active cart. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItems(Vec<Item>);

impl CartItems {
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.0
    }

    /// Sum of all prices, or `None` when it does not fit in a `u64`.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.0
            .iter()
            .try_fold(0_u64, |sum, item| sum.checked_add(item.price))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaidOrder {
    pub items: Vec<Item>,
    pub total: u64,
}

tag!(pub Empty);
tag!(pub Active => CartItems);
tag!(pub Paid => PaidOrder);

pub type EmptyCart = Tagged<Empty>;
pub type ActiveCart = Tagged<Active>;
pub type PaidCart = Tagged<Paid>;

tagged_union! {
    /// A cart that still accepts items.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum OpenCart with OpenCartHandlers {
        Empty(Empty) => empty,
        Active(Active) => active,
    }
}

impl OpenCart {
    #[must_use]
    pub fn items(&self) -> &[Item] {
        match self {
            Self::Empty(_) => &[],
            Self::Active(cart) => cart.value().items(),
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items().iter().any(|item| item.id == id)
    }
}

// ── Errors ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("item {id} is already in the cart")]
    ItemAlreadyInCart { id: String },
    #[error("item {id} is not in the cart")]
    ItemNotInCart { id: String },
    #[error("cannot pay for an empty cart")]
    NothingToPay,
    #[error("cart total exceeds the largest payable amount")]
    TotalOverflow,
    #[error(transparent)]
    InvalidItem(#[from] ItemError),
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl CartError {
    /// Stable label for the error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ItemAlreadyInCart { .. } => "ItemAlreadyInCart",
            Self::ItemNotInCart { .. } => "ItemNotInCart",
            Self::NothingToPay => "NothingToPay",
            Self::TotalOverflow => "TotalOverflow",
            Self::InvalidItem(_) => "InvalidItem",
            Self::Context(_) => "Context",
        }
    }
}

// ── Transitions ──────────────────────────────────────────────

#[must_use]
pub fn create_cart() -> OpenCart {
    EmptyCart::marker().into()
}

pub fn add_item(cart: impl Into<OpenCart>, item: Item) -> Result<ActiveCart, CartError> {
    let cart = cart.into();
    if cart.contains(&item.id) {
        return Err(CartError::ItemAlreadyInCart { id: item.id });
    }

    let mut items = cart.items().to_vec();
    debug!(item = %item.id, price = item.price, "item added to cart");
    items.push(item);
    Ok(create_tagged(CartItems(items)))
}

pub fn remove_item(cart: ActiveCart, id: &str) -> Result<OpenCart, CartError> {
    let CartItems(mut items) = cart.into_value();
    let Some(position) = items.iter().position(|item| item.id == id) else {
        return Err(CartError::ItemNotInCart { id: id.to_owned() });
    };

    items.remove(position);
    debug!(item = id, remaining = items.len(), "item removed from cart");
    if items.is_empty() {
        Ok(create_cart())
    } else {
        Ok(create_tagged::<Active>(CartItems(items)).into())
    }
}

pub fn pay(cart: impl Into<OpenCart>) -> Result<PaidCart, CartError> {
    cart.into().match_tag(OpenCartHandlers {
        empty: Box::new(|_| Err(CartError::NothingToPay)),
        active: Box::new(|cart| {
            let Some(total) = cart.value().total() else {
                return Err(CartError::TotalOverflow);
            };
            let CartItems(items) = cart.into_value();
            debug!(total, items = items.len(), "cart paid");
            Ok(create_tagged(PaidOrder { items, total }))
        }),
    })
}

/// A paid order together with figures captured on the way to payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub order: PaidCart,
    pub line_count: usize,
    pub total: u64,
}

const LINE_COUNT: ContextKey<usize> = ContextKey::new("line_count");
const TOTAL: ContextKey<u64> = ContextKey::new("total");

/// Pay for `cart` and summarize the result.
pub fn checkout(cart: impl Into<OpenCart>) -> Result<Receipt, CartError> {
    pipe_result_with_context(Ok::<_, CartError>(cart.into()))
        .set_context(|cart, ctx| ctx.set(LINE_COUNT, cart.items().len()))
        .flat_map(|cart, _| pay(cart))
        .set_context(|paid, ctx| ctx.set(TOTAL, paid.value().total))
        .flat_map(|order, ctx| {
            let line_count = *ctx.require(LINE_COUNT)?;
            let total = *ctx.require(TOTAL)?;
            Ok::<_, CartError>(Receipt {
                order,
                line_count,
                total,
            })
        })
        .into_result()
}
