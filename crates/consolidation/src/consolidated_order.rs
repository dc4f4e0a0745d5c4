use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use petalflow_core::{AggregateId, Entity, ValueObject};
use petalflow_parties::PartyId;
use petalflow_products::ProductId;

use crate::plan::SupplierBatch;

/// Consolidated order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsolidatedOrderId(pub AggregateId);

impl ConsolidatedOrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ConsolidatedOrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregated demand for one product inside a supplier shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedOrderItem {
    pub product_id: ProductId,
    pub total_qty: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl ValueObject for ConsolidatedOrderItem {}

/// Shipment record for one supplier, produced by a consolidation run.
///
/// Write-once: there are no mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedOrder {
    id: ConsolidatedOrderId,
    supplier_id: PartyId,
    items: Vec<ConsolidatedOrderItem>,
    created_at: DateTime<Utc>,
}

impl ConsolidatedOrder {
    /// Materialize a supplier batch into its immutable shipment record.
    pub fn from_batch(
        id: ConsolidatedOrderId,
        batch: SupplierBatch,
        created_at: DateTime<Utc>,
    ) -> Self {
        let items = batch
            .items
            .into_iter()
            .map(|item| ConsolidatedOrderItem {
                product_id: item.product_id,
                total_qty: item.total_qty,
                unit_price: item.unit_price,
                line_total: item.unit_price * Decimal::from(item.total_qty),
            })
            .collect();

        Self {
            id,
            supplier_id: batch.supplier_id,
            items,
            created_at,
        }
    }

    pub fn id_typed(&self) -> ConsolidatedOrderId {
        self.id
    }

    pub fn supplier_id(&self) -> PartyId {
        self.supplier_id
    }

    pub fn items(&self) -> &[ConsolidatedOrderItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn grand_total(&self) -> Decimal {
        self.items.iter().map(|i| i.line_total).sum()
    }
}

impl Entity for ConsolidatedOrder {
    type Id = ConsolidatedOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlannedItem;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_batch_computes_line_totals() {
        let supplier = PartyId::new(AggregateId::new());
        let rose = ProductId::new(AggregateId::new());
        let batch = SupplierBatch {
            supplier_id: supplier,
            items: vec![PlannedItem {
                product_id: rose,
                total_qty: 30,
                unit_price: dec("2.00"),
            }],
        };

        let consolidated = ConsolidatedOrder::from_batch(
            ConsolidatedOrderId::new(AggregateId::new()),
            batch,
            Utc::now(),
        );

        assert_eq!(consolidated.supplier_id(), supplier);
        assert_eq!(consolidated.items().len(), 1);
        assert_eq!(consolidated.items()[0].line_total, dec("60.00"));
        assert_eq!(consolidated.grand_total(), dec("60.00"));
    }

    #[test]
    fn grand_total_sums_all_lines() {
        let supplier = PartyId::new(AggregateId::new());
        let batch = SupplierBatch {
            supplier_id: supplier,
            items: vec![
                PlannedItem {
                    product_id: ProductId::new(AggregateId::new()),
                    total_qty: 10,
                    unit_price: dec("1.50"),
                },
                PlannedItem {
                    product_id: ProductId::new(AggregateId::new()),
                    total_qty: 4,
                    unit_price: dec("0.25"),
                },
            ],
        };

        let consolidated = ConsolidatedOrder::from_batch(
            ConsolidatedOrderId::new(AggregateId::new()),
            batch,
            Utc::now(),
        );

        assert_eq!(consolidated.grand_total(), dec("16.00"));
    }
}
