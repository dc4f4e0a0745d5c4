//! Consolidation domain module.
//!
//! Batches validated orders into one shipment per supplier: lines are grouped
//! by the product's owning supplier, quantities summed per product, unit
//! prices carried over from the first contributing order line. The resulting
//! [`ConsolidatedOrder`] snapshots are immutable once created.

pub mod consolidated_order;
pub mod plan;

pub use consolidated_order::{ConsolidatedOrder, ConsolidatedOrderId, ConsolidatedOrderItem};
pub use plan::{plan_by_supplier, PlannedItem, SupplierBatch};
