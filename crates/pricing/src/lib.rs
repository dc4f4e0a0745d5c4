//! Volume-discount pricing engine.
//!
//! Pure decision logic (no IO, no storage): given a base price, a quantity and
//! the product's discount tiers, compute the unit price for an order line.

pub mod engine;

pub use engine::{price_line, PricingTier};
