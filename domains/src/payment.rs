//! Payment methods built from validated primitives.
//!
//! Currencies and card networks are marker tags: their payload is their own
//! label. Card numbers and amounts only exist once their smart constructors
//! accept them.

use std::fmt;

use serde::{Deserialize, Serialize};
use statecraft_core::{ContextError, ContextKey, pipe_result_with_context};
use statecraft_types::{Tagged, create_tagged, tag, tagged_union};
use thiserror::Error;
use tracing::debug;

// ============================================================================
// Markers
// ============================================================================

tag!(pub Usd);
tag!(pub Eur);

tagged_union! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Currency with CurrencyHandlers {
        Usd(Usd) => usd,
        Eur(Eur) => eur,
    }
}

impl Currency {
    pub fn parse(code: &str) -> Result<Self, PaymentError> {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Tagged::<Usd>::marker().into()),
            "EUR" => Ok(Tagged::<Eur>::marker().into()),
            _ => Err(PaymentError::UnsupportedCurrency(code.to_owned())),
        }
    }
}

tag!(pub Visa);
tag!(pub Mastercard);

tagged_union! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CardNetwork with CardNetworkHandlers {
        Visa(Visa) => visa,
        Mastercard(Mastercard) => mastercard,
    }
}

impl CardNetwork {
    /// Identify the network from the issuer prefix.
    pub fn detect(number: &CardNumber) -> Result<Self, PaymentError> {
        let digits = number.digits();
        let prefix = |len: usize| digits[..len].parse::<u32>().unwrap_or(0);

        if digits.starts_with('4') {
            Ok(Tagged::<Visa>::marker().into())
        } else if (51..=55).contains(&prefix(2)) || (2221..=2720).contains(&prefix(4)) {
            Ok(Tagged::<Mastercard>::marker().into())
        } else {
            Err(PaymentError::UnsupportedNetwork)
        }
    }
}

// ============================================================================
// Validated primitives
// ============================================================================

/// A positive amount in minor units (cents), capped at one million units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Amount(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount must be greater than zero")]
    Zero,
    #[error("amount exceeds the maximum of {max} minor units")]
    TooLarge { max: u64 },
}

impl Amount {
    pub const MAX: u64 = 100_000_000;

    pub fn new(minor_units: u64) -> Result<Self, AmountError> {
        match minor_units {
            0 => Err(AmountError::Zero),
            n if n > Self::MAX => Err(AmountError::TooLarge { max: Self::MAX }),
            n => Ok(Self(n)),
        }
    }

    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for Amount {
    type Error = AmountError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for u64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

/// A card number: 13 to 19 digits with a valid Luhn checksum.
///
/// Spaces and dashes are accepted as separators and dropped. `Debug` only
/// shows the last four digits.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CardNumber(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardNumberError {
    #[error("card number may only contain digits")]
    NonDigit,
    #[error("card number must have 13 to 19 digits (got {0})")]
    Length(usize),
    #[error("card number failed checksum validation")]
    Checksum,
}

impl CardNumber {
    pub fn parse(raw: &str) -> Result<Self, CardNumberError> {
        let digits: String = raw.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardNumberError::NonDigit);
        }
        if !(13..=19).contains(&digits.len()) {
            return Err(CardNumberError::Length(digits.len()));
        }
        if !passes_luhn(&digits) {
            return Err(CardNumberError::Checksum);
        }
        Ok(Self(digits))
    }

    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn last_four(&self) -> &str {
        &self.0[self.0.len() - 4..]
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardNumber(****{})", self.last_four())
    }
}

fn passes_luhn(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(position, byte)| {
            let digit = u32::from(byte - b'0');
            if position % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();
    sum % 10 == 0
}

// ============================================================================
// Payment methods
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub number: CardNumber,
    pub network: CardNetwork,
}

tag!(pub Cash);
tag!(pub Card => CardDetails);

tagged_union! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PaymentMethod with PaymentMethodHandlers {
        Cash(Cash) => cash,
        Card(Card) => card,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub method: PaymentMethod,
    pub amount: Amount,
    pub currency: Currency,
}

impl Payment {
    #[must_use]
    pub fn describe(&self) -> String {
        let method = self.method.clone().match_tag(PaymentMethodHandlers {
            cash: Box::new(|_| "cash".to_owned()),
            card: Box::new(|card| {
                let details = card.into_value();
                let network = details.network.match_tag(CardNetworkHandlers {
                    visa: Box::new(|_| "Visa"),
                    mastercard: Box::new(|_| "Mastercard"),
                });
                format!("{network} ending {}", details.number.last_four())
            }),
        });
        format!(
            "{} {} via {method}",
            self.amount.minor_units(),
            self.currency.tag()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("card network is not accepted")]
    UnsupportedNetwork,
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error(transparent)]
    CardNumber(#[from] CardNumberError),
    #[error(transparent)]
    Context(#[from] ContextError),
}

const AMOUNT: ContextKey<Amount> = ContextKey::new("amount");
const CURRENCY: ContextKey<Currency> = ContextKey::new("currency");

/// Validate every part of a card payment, stopping at the first problem.
pub fn create_card_payment(
    raw_number: &str,
    minor_units: u64,
    currency_code: &str,
) -> Result<Payment, PaymentError> {
    pipe_result_with_context(Currency::parse(currency_code))
        .set_context(|currency, ctx| ctx.set(CURRENCY, *currency))
        .flat_map(|_, _| Amount::new(minor_units))
        .set_context(|amount, ctx| ctx.set(AMOUNT, *amount))
        .flat_map(|_, _| CardNumber::parse(raw_number))
        .flat_map(|number, _| {
            CardNetwork::detect(&number).map(|network| CardDetails { number, network })
        })
        .flat_map(|details, ctx| {
            let amount = *ctx.require(AMOUNT)?;
            let currency = *ctx.require(CURRENCY)?;
            Ok::<_, PaymentError>(Payment {
                method: create_tagged::<Card>(details).into(),
                amount,
                currency,
            })
        })
        .tap(|payment, _| debug!(payment = %payment.describe(), "card payment created"))
        .into_result()
}

pub fn create_cash_payment(minor_units: u64, currency_code: &str) -> Result<Payment, PaymentError> {
    pipe_result_with_context(Currency::parse(currency_code))
        .set_context(|currency, ctx| ctx.set(CURRENCY, *currency))
        .flat_map(|_, _| Amount::new(minor_units))
        .flat_map(|amount, ctx| {
            let currency = *ctx.require(CURRENCY)?;
            Ok::<_, PaymentError>(Payment {
                method: Tagged::<Cash>::marker().into(),
                amount,
                currency,
            })
        })
        .tap(|payment, _| debug!(payment = %payment.describe(), "cash payment created"))
        .into_result()
}
