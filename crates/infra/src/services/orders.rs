use chrono::Utc;
use tracing::info;

use petalflow_core::{AggregateId, DomainError, DomainResult};
use petalflow_orders::{Order, OrderId, OrderStatus};
use petalflow_parties::{Caller, PartyId, PartyKind};
use petalflow_products::ProductId;

use crate::store::TransactionalStore;

/// Order lifecycle manager.
///
/// Every operation is one store transaction: the item change and the totals
/// recalculation persist together, and `complete` either deducts stock for
/// every line and flips the status, or changes nothing.
#[derive(Debug)]
pub struct OrderService<S> {
    store: S,
}

impl<S> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: TransactionalStore> OrderService<S> {
    /// Open a draft order for a customer.
    pub fn create(&self, customer_id: PartyId) -> DomainResult<Order> {
        self.store.transaction(|state| {
            let customer = state
                .party_of_kind(customer_id, PartyKind::Customer)
                .ok_or_else(|| {
                    DomainError::invalid_argument("Customer not found or invalid role")
                })?;
            if !customer.can_transact() {
                return Err(DomainError::invalid_state("Customer is suspended"));
            }

            let order = Order::create(OrderId::new(AggregateId::new()), customer_id, Utc::now());
            state.upsert_order(order.clone());
            info!(order_id = %order.id_typed(), customer_id = %customer_id, "order created");
            Ok(order)
        })
    }

    /// Add a product line, or overwrite its quantity if already present.
    /// The unit price is snapshotted from the product's current base price
    /// and tiers at this moment.
    pub fn add_item(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        qty: i64,
    ) -> DomainResult<Order> {
        self.store.transaction(|state| {
            let mut order = state
                .order(order_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Order not found"))?;

            if !order.is_modifiable() {
                return Err(DomainError::invalid_state(
                    "Can only add items to draft orders",
                ));
            }

            let product = state
                .product(product_id)
                .ok_or_else(|| DomainError::not_found("Product not found"))?;

            let unit_price = product.unit_price_for(qty)?;
            order.upsert_item(product_id, qty, unit_price, Utc::now())?;
            state.upsert_order(order.clone());
            Ok(order)
        })
    }

    pub fn remove_item(&self, order_id: OrderId, product_id: ProductId) -> DomainResult<Order> {
        self.update_order(order_id, |order| order.remove_item(product_id, Utc::now()))
    }

    pub fn submit(&self, order_id: OrderId, caller: Caller) -> DomainResult<Order> {
        let order = self.update_order(order_id, |order| order.submit(caller, Utc::now()))?;
        info!(order_id = %order_id, "order submitted for validation");
        Ok(order)
    }

    pub fn approve(&self, order_id: OrderId) -> DomainResult<Order> {
        let order = self.update_order(order_id, |order| order.approve(Utc::now()))?;
        info!(order_id = %order_id, "order approved");
        Ok(order)
    }

    pub fn decline(&self, order_id: OrderId) -> DomainResult<Order> {
        let order = self.update_order(order_id, |order| order.decline(Utc::now()))?;
        info!(order_id = %order_id, "order declined");
        Ok(order)
    }

    pub fn reject(&self, order_id: OrderId) -> DomainResult<Order> {
        let order = self.update_order(order_id, |order| order.reject(Utc::now()))?;
        info!(order_id = %order_id, "order rejected back to draft");
        Ok(order)
    }

    /// Fulfill a validated order: verify stock for every line against this
    /// transaction's snapshot, then deduct and complete. All-or-nothing.
    pub fn complete(&self, order_id: OrderId) -> DomainResult<Order> {
        self.store.transaction(|state| {
            let mut order = state
                .order(order_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Order not found"))?;

            if order.status() != OrderStatus::Validated {
                return Err(DomainError::invalid_state("Order is not validated"));
            }

            // Check every line before touching any stock row; the first
            // shortage is reported.
            for item in order.items() {
                let product = state
                    .product(item.product_id)
                    .ok_or_else(|| DomainError::not_found("Product not found"))?;
                product.ensure_stock(item.qty)?;
            }

            for item in order.items() {
                let product = state
                    .product_mut(item.product_id)
                    .ok_or_else(|| DomainError::not_found("Product not found"))?;
                product.deduct_stock(item.qty)?;
            }

            order.mark_completed(Utc::now())?;
            state.upsert_order(order.clone());
            info!(order_id = %order_id, "order completed, stock deducted");
            Ok(order)
        })
    }

    /// Delete an order (any status) together with its items.
    pub fn remove(&self, order_id: OrderId) -> DomainResult<()> {
        self.store.transaction(|state| {
            state.remove_order(order_id).ok_or_else(|| {
                DomainError::not_found(format!("Order with ID {order_id} not found"))
            })?;
            info!(order_id = %order_id, "order removed");
            Ok(())
        })
    }

    pub fn find_all(&self, customer_id: Option<PartyId>) -> DomainResult<Vec<Order>> {
        self.store.read(|state| {
            let mut orders: Vec<Order> = state
                .orders()
                .filter(|o| customer_id.is_none_or(|c| o.customer_id() == c))
                .cloned()
                .collect();
            orders.sort_by_key(|o| std::cmp::Reverse((o.created_at(), o.id_typed())));
            Ok(orders)
        })
    }

    pub fn find_one(&self, order_id: OrderId) -> DomainResult<Order> {
        self.store.read(|state| {
            state
                .order(order_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Order not found"))
        })
    }

    fn update_order(
        &self,
        order_id: OrderId,
        f: impl FnOnce(&mut Order) -> DomainResult<()>,
    ) -> DomainResult<Order> {
        self.store.transaction(|state| {
            let mut order = state
                .order(order_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Order not found"))?;
            f(&mut order)?;
            state.upsert_order(order.clone());
            Ok(order)
        })
    }
}
