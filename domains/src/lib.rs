//! Example domain models built on Statecraft.
//!
//! Each module encodes its states as distinct tagged types and wires its
//! transitions through the pipelines from `statecraft-core`:
//!
//! - [`package`]: unshipped → shipped → delivered.
//! - [`payment`]: validated cards and cash with currency markers.
//! - [`cart`]: empty → active → paid.
//! - [`email`]: unverified → verified.

pub mod cart;
pub mod email;
pub mod package;
pub mod payment;
