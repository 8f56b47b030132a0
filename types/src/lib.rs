//! Tagged values for Statecraft.
//!
//! This crate contains the nominal tagging primitive used to encode domain
//! states and validated primitives as distinct types. No IO, no async.
//!
//! - [`Tag`] names a variant and fixes the type of its payload.
//! - [`Tagged`] pairs a tag with a payload. Two tags with structurally equal
//!   payloads are still different types.
//! - [`tag!`] declares tag types, [`tagged_union!`] declares a closed set of
//!   tagged variants with exhaustive dispatch via `match_tag`.

mod tagged;
mod union;

pub use tagged::{Tag, TagMismatch, Tagged, create_tagged};
