//! Product catalog domain module.
//!
//! A product belongs to exactly one supplier, carries a decimal base price,
//! a non-negative stock level and an ordered list of volume-discount tiers.

pub mod product;

pub use product::{Product, ProductId, ProductUpdate};
