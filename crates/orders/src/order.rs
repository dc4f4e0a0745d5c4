use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use petalflow_core::{AggregateId, AggregateRoot, DomainError, DomainResult, Entity, ValueObject};
use petalflow_parties::{Caller, PartyId};
use petalflow_products::ProductId;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order status lifecycle.
///
/// Forward path: draft -> pending_validation -> validated -> completed.
/// Alternate edges: decline from draft or pending validation (terminal),
/// reject back to draft from pending validation or validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    PendingValidation,
    Validated,
    Completed,
    Declined,
}

/// Order line: quantity of a product at a unit price snapshotted when the
/// line was priced. The snapshot is never recomputed, even if the product's
/// base price or tiers change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub qty: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl ValueObject for OrderItem {}

/// Aggregate root: Order.
///
/// Owns its items exclusively; items cannot outlive the order. Mutable only
/// while in draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: PartyId,
    status: OrderStatus,
    items: Vec<OrderItem>,
    subtotal: Decimal,
    discount: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    consolidated_at: Option<DateTime<Utc>>,
    version: u64,
}

impl Order {
    /// Create a new draft order with no items.
    pub fn create(id: OrderId, customer_id: PartyId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_id,
            status: OrderStatus::Draft,
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
            created_at: now,
            updated_at: now,
            consolidated_at: None,
            version: 1,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> PartyId {
        self.customer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn item(&self, product_id: ProductId) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn consolidated_at(&self) -> Option<DateTime<Utc>> {
        self.consolidated_at
    }

    pub fn is_modifiable(&self) -> bool {
        matches!(self.status, OrderStatus::Draft)
    }

    /// Insert a line, or overwrite quantity and price if the product is
    /// already on the order (replace, not increment).
    pub fn upsert_item(
        &mut self,
        product_id: ProductId,
        qty: i64,
        unit_price: Decimal,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if !self.is_modifiable() {
            return Err(DomainError::invalid_state(
                "Can only add items to draft orders",
            ));
        }
        if qty < 1 {
            return Err(DomainError::invalid_argument("quantity must be at least 1"));
        }
        if unit_price < Decimal::ZERO {
            return Err(DomainError::invalid_argument(
                "unit price cannot be negative",
            ));
        }

        let line_total = unit_price * Decimal::from(qty);

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(existing) => {
                existing.qty = qty;
                existing.unit_price = unit_price;
                existing.line_total = line_total;
            }
            None => self.items.push(OrderItem {
                product_id,
                qty,
                unit_price,
                line_total,
            }),
        }

        self.recalculate_totals();
        self.touch(now);
        Ok(())
    }

    /// Delete the line for `product_id`.
    pub fn remove_item(&mut self, product_id: ProductId, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_modifiable() {
            return Err(DomainError::invalid_state(
                "Can only remove items from draft orders",
            ));
        }

        let idx = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or_else(|| DomainError::not_found("Item not found in order"))?;
        self.items.remove(idx);

        self.recalculate_totals();
        self.touch(now);
        Ok(())
    }

    /// Submit the draft for review.
    ///
    /// Ownership is checked before status: a customer may only submit their
    /// own order, while employees may submit on behalf of any customer.
    pub fn submit(&mut self, caller: Caller, now: DateTime<Utc>) -> DomainResult<()> {
        if !caller.is_employee() && caller.id != self.customer_id {
            return Err(DomainError::forbidden("Can only submit own orders"));
        }
        if self.status != OrderStatus::Draft {
            return Err(DomainError::invalid_state("Order is not in draft status"));
        }
        if self.items.is_empty() {
            return Err(DomainError::invalid_state("Cannot submit empty order"));
        }

        self.status = OrderStatus::PendingValidation;
        self.touch(now);
        Ok(())
    }

    /// Approve a pending order.
    pub fn approve(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::PendingValidation {
            return Err(DomainError::invalid_state("Order is not pending validation"));
        }
        self.status = OrderStatus::Validated;
        self.touch(now);
        Ok(())
    }

    /// Decline an order before or during review. Terminal.
    pub fn decline(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::PendingValidation && self.status != OrderStatus::Draft {
            return Err(DomainError::invalid_state(
                "Order cannot be declined from its current status",
            ));
        }
        self.status = OrderStatus::Declined;
        self.touch(now);
        Ok(())
    }

    /// Send an order back to draft for rework.
    pub fn reject(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::PendingValidation && self.status != OrderStatus::Validated {
            return Err(DomainError::invalid_state(
                "Order must be pending validation or validated to be rejected",
            ));
        }
        self.status = OrderStatus::Draft;
        self.touch(now);
        Ok(())
    }

    /// Flip a validated order to completed.
    ///
    /// Stock verification and deduction are coordinated by the lifecycle
    /// service in the same transaction; this transition only guards status.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::Validated {
            return Err(DomainError::invalid_state("Order is not validated"));
        }
        self.status = OrderStatus::Completed;
        self.touch(now);
        Ok(())
    }

    /// Stamp the order as consolidated into a supplier shipment.
    ///
    /// Dispatch to the supplier counts as final completion; no stock is
    /// deducted on this path.
    pub fn mark_consolidated(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.consolidated_at.is_some() {
            return Err(DomainError::invalid_state("order is already consolidated"));
        }
        if self.status != OrderStatus::Validated {
            return Err(DomainError::invalid_state(
                "only validated orders can be consolidated",
            ));
        }
        self.consolidated_at = Some(now);
        self.status = OrderStatus::Completed;
        self.touch(now);
        Ok(())
    }

    /// subtotal = sum of line totals; discount reserved for order-level
    /// promotions (currently always zero); total = subtotal - discount.
    fn recalculate_totals(&mut self) {
        self.subtotal = self.items.iter().map(|i| i.line_total).sum();
        self.discount = Decimal::ZERO;
        self.total = self.subtotal - self.discount;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.version += 1;
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Order {
    fn version(&self) -> u64 {
        self.version
    }
}
