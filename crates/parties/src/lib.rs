//! Party directory domain module.
//!
//! Customers place orders, employees review them, suppliers own products and
//! receive consolidated shipments. All three are parties; authentication and
//! permission gating live outside this workspace, so the only identity the
//! domain consumes is the already-authenticated [`Caller`].

pub mod party;

pub use party::{Caller, Party, PartyId, PartyKind, PartyStatus};
