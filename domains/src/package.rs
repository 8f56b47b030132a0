//! Package lifecycle: unshipped → shipped → delivered.
//!
//! Each state is its own tagged type, so a transition only accepts the state
//! it starts from. Shipping a package that was already delivered does not
//! compile:
//!
//! ```compile_fail
//! use statecraft_domains::package::{create_unshipped, deliver, ship};
//!
//! let unshipped = create_unshipped("1").unwrap();
//! let delivered = deliver(ship(unshipped, "TRK1").unwrap());
//! let _ = ship(delivered, "TRK2");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use statecraft_core::pipe_result;
use statecraft_types::{Tagged, create_tagged, tag, tagged_union};
use thiserror::Error;
use tracing::debug;

// ── Identifiers ──────────────────────────────────────────────

/// A package identifier: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageId(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("package id must not be empty")]
pub struct EmptyPackageId;

impl PackageId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmptyPackageId> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            Err(EmptyPackageId)
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PackageId {
    type Error = EmptyPackageId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PackageId> for String {
    fn from(value: PackageId) -> Self {
        value.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Carrier tracking code: ASCII alphanumeric, 4 to 32 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingCode(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed tracking code: {0:?}")]
pub struct MalformedTrackingCode(pub String);

impl TrackingCode {
    const MIN_LEN: usize = 4;
    const MAX_LEN: usize = 32;

    pub fn new(raw: impl AsRef<str>) -> Result<Self, MalformedTrackingCode> {
        let raw = raw.as_ref().trim();
        let valid_len = (Self::MIN_LEN..=Self::MAX_LEN).contains(&raw.len());
        if valid_len && raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(Self(raw.to_ascii_uppercase()))
        } else {
            Err(MalformedTrackingCode(raw.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TrackingCode {
    type Error = MalformedTrackingCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrackingCode> for String {
    fn from(value: TrackingCode) -> Self {
        value.0
    }
}

// ── States ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: PackageId,
    pub tracking: TrackingCode,
}

tag!(pub Unshipped => PackageId);
tag!(pub Shipped => Shipment);
tag!(pub Delivered => Shipment);

pub type UnshippedPackage = Tagged<Unshipped>;
pub type ShippedPackage = Tagged<Shipped>;
pub type DeliveredPackage = Tagged<Delivered>;

tagged_union! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PackageState with PackageStateHandlers {
        Unshipped(Unshipped) => unshipped,
        Shipped(Shipped) => shipped,
        Delivered(Delivered) => delivered,
    }
}

impl PackageState {
    #[must_use]
    pub fn id(&self) -> &PackageId {
        match self {
            Self::Unshipped(package) => package.value(),
            Self::Shipped(package) => &package.value().id,
            Self::Delivered(package) => &package.value().id,
        }
    }

    /// Human-readable status line.
    #[must_use]
    pub fn describe(self) -> String {
        self.match_tag(PackageStateHandlers {
            unshipped: Box::new(|package| {
                format!("package {} is waiting to ship", package.value())
            }),
            shipped: Box::new(|package| {
                let shipment = package.value();
                format!("package {} is in transit ({})", shipment.id, shipment.tracking.as_str())
            }),
            delivered: Box::new(|package| format!("package {} was delivered", package.value().id)),
        })
    }
}

// ── Errors ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageError {
    #[error(transparent)]
    InvalidId(#[from] EmptyPackageId),
    #[error(transparent)]
    InvalidTracking(#[from] MalformedTrackingCode),
}

// ── Transitions ──────────────────────────────────────────────

pub fn create_unshipped(raw_id: impl AsRef<str>) -> Result<UnshippedPackage, EmptyPackageId> {
    PackageId::new(raw_id).map(create_tagged)
}

/// Hand an unshipped package to a carrier.
pub fn ship(
    package: UnshippedPackage,
    tracking: impl AsRef<str>,
) -> Result<ShippedPackage, MalformedTrackingCode> {
    let tracking = TrackingCode::new(tracking)?;
    let id = package.into_value();
    debug!(package = %id, tracking = tracking.as_str(), "package shipped");
    Ok(create_tagged(Shipment { id, tracking }))
}

#[must_use]
pub fn deliver(package: ShippedPackage) -> DeliveredPackage {
    let shipment = package.into_value();
    debug!(package = %shipment.id, "package delivered");
    create_tagged(shipment)
}

/// Run the whole lifecycle for one package.
pub fn ship_and_deliver(
    raw_id: impl AsRef<str>,
    tracking: impl AsRef<str>,
) -> Result<DeliveredPackage, PackageError> {
    pipe_result(create_unshipped(raw_id))
        .widen_error::<PackageError>()
        .flat_map(|package| ship(package, tracking))
        .map(deliver)
        .into_result()
}
