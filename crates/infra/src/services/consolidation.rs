use chrono::Utc;
use serde::Serialize;
use tracing::info;

use petalflow_consolidation::{plan_by_supplier, ConsolidatedOrder, ConsolidatedOrderId};
use petalflow_core::{AggregateId, DomainError, DomainResult};
use petalflow_orders::{Order, OrderStatus};
use petalflow_parties::PartyId;

use crate::store::TransactionalStore;

/// Result of a consolidation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationOutcome {
    pub consolidated_orders: Vec<ConsolidatedOrder>,
    pub orders_processed: usize,
}

/// Batches validated orders into per-supplier shipments.
#[derive(Debug)]
pub struct ConsolidationService<S> {
    store: S,
}

impl<S> ConsolidationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: TransactionalStore> ConsolidationService<S> {
    /// Consolidate every validated, not-yet-consolidated order.
    ///
    /// One transaction covers the whole run: shipment creation and the
    /// stamping of every source order commit together or not at all. Orders
    /// flip straight to completed on this path; dispatch to the supplier
    /// counts as final completion and no stock is deducted here (the direct
    /// `complete` transition is the one that touches stock).
    pub fn consolidate(&self) -> DomainResult<ConsolidationOutcome> {
        self.store.transaction(|state| {
            let mut selected: Vec<Order> = state
                .orders()
                .filter(|o| {
                    o.status() == OrderStatus::Validated && o.consolidated_at().is_none()
                })
                .cloned()
                .collect();
            // Stable iteration order: creation time ascending decides which
            // order line donates the unit price of a consolidated line.
            selected.sort_by_key(|o| (o.created_at(), o.id_typed()));

            if selected.is_empty() {
                return Err(DomainError::invalid_state(
                    "No validated orders to consolidate",
                ));
            }

            let order_refs: Vec<&Order> = selected.iter().collect();
            let batches = plan_by_supplier(&order_refs, |product_id| {
                state.product(product_id).map(|p| p.supplier_id())
            })?;

            let now = Utc::now();
            let mut consolidated_orders = Vec::with_capacity(batches.len());
            for batch in batches {
                let consolidated = ConsolidatedOrder::from_batch(
                    ConsolidatedOrderId::new(AggregateId::new()),
                    batch,
                    now,
                );
                state.insert_consolidated_order(consolidated.clone());
                consolidated_orders.push(consolidated);
            }

            for source in &selected {
                let mut order = state
                    .order(source.id_typed())
                    .cloned()
                    .ok_or_else(|| DomainError::not_found("Order not found"))?;
                order.mark_consolidated(now)?;
                state.upsert_order(order);
            }

            info!(
                suppliers = consolidated_orders.len(),
                orders_processed = selected.len(),
                "consolidation run committed"
            );

            Ok(ConsolidationOutcome {
                consolidated_orders,
                orders_processed: selected.len(),
            })
        })
    }

    pub fn find_all(&self, supplier_id: Option<PartyId>) -> DomainResult<Vec<ConsolidatedOrder>> {
        self.store.read(|state| {
            let mut consolidated: Vec<ConsolidatedOrder> = state
                .consolidated_orders()
                .filter(|c| supplier_id.is_none_or(|s| c.supplier_id() == s))
                .cloned()
                .collect();
            consolidated.sort_by_key(|c| std::cmp::Reverse((c.created_at(), c.id_typed())));
            Ok(consolidated)
        })
    }

    pub fn find_one(&self, id: ConsolidatedOrderId) -> DomainResult<ConsolidatedOrder> {
        self.store.read(|state| {
            state
                .consolidated_order(id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Consolidated order not found"))
        })
    }
}
