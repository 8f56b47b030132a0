//! Email verification: unverified → verified.

use std::fmt;

use serde::{Deserialize, Serialize};
use statecraft_core::{ContextError, ContextKey, pipe_result_with_context};
use statecraft_types::{Tagged, create_tagged, tag, tagged_union};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("malformed email address: {0:?}")]
    Malformed(String),
    #[error("email address is {len} characters long, the limit is {max}")]
    TooLong { len: usize, max: usize },
    #[error("verification code must be exactly six digits")]
    InvalidCode,
    #[error("verification code does not match")]
    CodeMismatch,
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// A syntactically valid, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LEN: usize = 254;

    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let address = raw.trim().to_ascii_lowercase();
        if address.len() > Self::MAX_LEN {
            return Err(EmailError::TooLong {
                len: address.len(),
                max: Self::MAX_LEN,
            });
        }

        let malformed = || EmailError::Malformed(raw.to_owned());
        let (local, domain) = address.split_once('@').ok_or_else(malformed)?;
        let domain_ok = domain
            .split_once('.')
            .is_some_and(|(host, _)| !host.is_empty())
            && !domain.ends_with('.');
        if local.is_empty()
            || !domain_ok
            || domain.contains('@')
            || address.chars().any(char::is_whitespace)
        {
            return Err(malformed());
        }
        Ok(Self(address))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A six-digit one-time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerificationCode([u8; 6]);

impl VerificationCode {
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let digits: [u8; 6] = raw
            .trim()
            .as_bytes()
            .try_into()
            .map_err(|_| EmailError::InvalidCode)?;
        if digits.iter().all(u8::is_ascii_digit) {
            Ok(Self(digits))
        } else {
            Err(EmailError::InvalidCode)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    pub address: EmailAddress,
    code: VerificationCode,
}

tag!(pub Unverified => PendingVerification);
tag!(pub Verified => EmailAddress);

pub type UnverifiedEmail = Tagged<Unverified>;
pub type VerifiedEmail = Tagged<Verified>;

tagged_union! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum EmailState with EmailStateHandlers {
        Unverified(Unverified) => unverified,
        Verified(Verified) => verified,
    }
}

impl EmailState {
    #[must_use]
    pub fn address(&self) -> &EmailAddress {
        match self {
            Self::Unverified(email) => &email.value().address,
            Self::Verified(email) => email.value(),
        }
    }
}

/// Record `raw` as awaiting confirmation with the code that was sent to it.
pub fn register(raw: &str, issued_code: &str) -> Result<UnverifiedEmail, EmailError> {
    let address = EmailAddress::parse(raw)?;
    let code = VerificationCode::parse(issued_code)?;
    Ok(create_tagged(PendingVerification { address, code }))
}

pub fn verify(email: UnverifiedEmail, submitted: &str) -> Result<VerifiedEmail, EmailError> {
    let submitted = VerificationCode::parse(submitted)?;
    let pending = email.into_value();
    if pending.code != submitted {
        return Err(EmailError::CodeMismatch);
    }
    debug!(address = %pending.address, "email verified");
    Ok(create_tagged(pending.address))
}

const ADDRESS: ContextKey<EmailAddress> = ContextKey::new("address");

/// Register and immediately confirm an address.
pub fn register_and_verify(
    raw: &str,
    issued_code: &str,
    submitted: &str,
) -> Result<VerifiedEmail, EmailError> {
    pipe_result_with_context(EmailAddress::parse(raw))
        .set_context(|address, ctx| ctx.set(ADDRESS, address.clone()))
        .flat_map(|_, _| VerificationCode::parse(issued_code))
        .flat_map(|code, ctx| {
            let address = ctx.require(ADDRESS)?.clone();
            Ok::<_, EmailError>(create_tagged::<Unverified>(PendingVerification {
                address,
                code,
            }))
        })
        .flat_map(|pending, _| verify(pending, submitted))
        .tap_error(|err, ctx| {
            let address = ctx.get(ADDRESS).map(EmailAddress::as_str);
            warn!(?address, %err, "email verification failed");
        })
        .into_result()
}
