use rust_decimal::Decimal;

use petalflow_core::{DomainError, DomainResult};
use petalflow_orders::Order;
use petalflow_parties::PartyId;
use petalflow_products::ProductId;

/// One product's aggregated demand within a supplier batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub product_id: ProductId,
    pub total_qty: i64,
    /// Snapshot from the first contributing order line; not re-priced.
    pub unit_price: Decimal,
}

/// All aggregated demand for a single supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierBatch {
    pub supplier_id: PartyId,
    pub items: Vec<PlannedItem>,
}

/// Group every line of the given orders by the product's owning supplier,
/// then by product within supplier, summing quantities.
///
/// Iteration order is the caller's order slice (expected: creation time
/// ascending), and both supplier batches and their items keep
/// first-encounter order so reruns over the same selection are
/// deterministic. The unit price of a (supplier, product) group is the one
/// on the first line encountered for that product.
pub fn plan_by_supplier<F>(orders: &[&Order], supplier_of: F) -> DomainResult<Vec<SupplierBatch>>
where
    F: Fn(ProductId) -> Option<PartyId>,
{
    let mut batches: Vec<SupplierBatch> = Vec::new();

    for order in orders {
        for line in order.items() {
            let supplier_id = supplier_of(line.product_id)
                .ok_or_else(|| DomainError::not_found("Product not found"))?;

            let batch_idx = match batches.iter().position(|b| b.supplier_id == supplier_id) {
                Some(idx) => idx,
                None => {
                    batches.push(SupplierBatch {
                        supplier_id,
                        items: Vec::new(),
                    });
                    batches.len() - 1
                }
            };
            let batch = &mut batches[batch_idx];

            match batch
                .items
                .iter_mut()
                .find(|i| i.product_id == line.product_id)
            {
                Some(existing) => existing.total_qty += line.qty,
                None => batch.items.push(PlannedItem {
                    product_id: line.product_id,
                    total_qty: line.qty,
                    unit_price: line.unit_price,
                }),
            }
        }
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    use petalflow_core::AggregateId;
    use petalflow_orders::OrderId;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn order_with(customer: PartyId, lines: &[(ProductId, i64, Decimal)]) -> Order {
        let mut order = Order::create(OrderId::new(AggregateId::new()), customer, Utc::now());
        for (product_id, qty, unit_price) in lines {
            order
                .upsert_item(*product_id, *qty, *unit_price, Utc::now())
                .unwrap();
        }
        order
    }

    fn party() -> PartyId {
        PartyId::new(AggregateId::new())
    }

    fn product() -> ProductId {
        ProductId::new(AggregateId::new())
    }

    #[test]
    fn sums_quantities_for_shared_product_across_orders() {
        // Two customers ordered the same product from supplier S: qty 10 + 20
        // at the snapshot price 2.00 -> one batch, one item, qty 30.
        let supplier = party();
        let rose = product();
        let owners: HashMap<ProductId, PartyId> = [(rose, supplier)].into();

        let a = order_with(party(), &[(rose, 10, dec("2.00"))]);
        let b = order_with(party(), &[(rose, 20, dec("2.00"))]);

        let batches =
            plan_by_supplier(&[&a, &b], |id| owners.get(&id).copied()).unwrap();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].supplier_id, supplier);
        assert_eq!(batches[0].items.len(), 1);
        assert_eq!(batches[0].items[0].total_qty, 30);
        assert_eq!(batches[0].items[0].unit_price, dec("2.00"));
    }

    #[test]
    fn groups_by_supplier_preserving_encounter_order() {
        let vivero = party();
        let floramar = party();
        let rose = product();
        let tulip = product();
        let lily = product();
        let owners: HashMap<ProductId, PartyId> =
            [(rose, vivero), (tulip, floramar), (lily, vivero)].into();

        let a = order_with(
            party(),
            &[(rose, 5, dec("2.50")), (tulip, 7, dec("1.10"))],
        );
        let b = order_with(party(), &[(lily, 3, dec("4.00"))]);

        let batches =
            plan_by_supplier(&[&a, &b], |id| owners.get(&id).copied()).unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].supplier_id, vivero);
        assert_eq!(batches[1].supplier_id, floramar);

        let vivero_products: Vec<ProductId> =
            batches[0].items.iter().map(|i| i.product_id).collect();
        assert_eq!(vivero_products, vec![rose, lily]);
    }

    #[test]
    fn unit_price_comes_from_first_contributing_line() {
        // The same product was snapshotted at different prices in different
        // orders; the consolidated line keeps the first one encountered.
        let supplier = party();
        let rose = product();
        let owners: HashMap<ProductId, PartyId> = [(rose, supplier)].into();

        let earlier = order_with(party(), &[(rose, 10, dec("2.00"))]);
        let later = order_with(party(), &[(rose, 20, dec("1.80"))]);

        let batches =
            plan_by_supplier(&[&earlier, &later], |id| owners.get(&id).copied()).unwrap();

        assert_eq!(batches[0].items[0].unit_price, dec("2.00"));
        assert_eq!(batches[0].items[0].total_qty, 30);
    }

    #[test]
    fn unknown_product_owner_is_not_found() {
        let rose = product();
        let a = order_with(party(), &[(rose, 1, dec("1.00"))]);

        let err = plan_by_supplier(&[&a], |_| None).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn no_orders_yields_no_batches() {
        let batches = plan_by_supplier(&[], |_| None).unwrap();
        assert!(batches.is_empty());
    }
}
