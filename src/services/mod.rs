// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod identity;
pub mod membership;

pub use identity::{IdentityAccount, IdentityClient};
pub use membership::{toggle_membership, MembershipUpdate, Relation};
