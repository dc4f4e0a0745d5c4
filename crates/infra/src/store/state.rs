use std::collections::HashMap;

use petalflow_consolidation::{ConsolidatedOrder, ConsolidatedOrderId};
use petalflow_orders::{Order, OrderId};
use petalflow_parties::{Party, PartyId, PartyKind};
use petalflow_products::{Product, ProductId};

/// The full persistent state: parties, products, orders and consolidated
/// orders.
///
/// Cloneable so a transaction can stage its changes on a working copy and
/// commit by replacement (rollback = dropping the copy).
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    parties: HashMap<PartyId, Party>,
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
    consolidated_orders: HashMap<ConsolidatedOrderId, ConsolidatedOrder>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    // Parties

    pub fn upsert_party(&mut self, party: Party) {
        self.parties.insert(party.id_typed(), party);
    }

    pub fn party(&self, id: PartyId) -> Option<&Party> {
        self.parties.get(&id)
    }

    pub fn party_mut(&mut self, id: PartyId) -> Option<&mut Party> {
        self.parties.get_mut(&id)
    }

    pub fn parties(&self) -> impl Iterator<Item = &Party> {
        self.parties.values()
    }

    pub fn party_by_email(&self, email: &str) -> Option<&Party> {
        self.parties.values().find(|p| p.email() == email)
    }

    /// The party, if it exists *and* has the expected kind.
    pub fn party_of_kind(&self, id: PartyId, kind: PartyKind) -> Option<&Party> {
        self.parties.get(&id).filter(|p| p.kind() == kind)
    }

    // Products

    pub fn upsert_product(&mut self, product: Product) {
        self.products.insert(product.id_typed(), product);
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn product_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.get_mut(&id)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn product_by_sku(&self, sku: &str) -> Option<&Product> {
        self.products.values().find(|p| p.sku() == sku)
    }

    pub fn remove_product(&mut self, id: ProductId) -> Option<Product> {
        self.products.remove(&id)
    }

    /// Whether any order line (in any status) references the product.
    pub fn product_is_referenced(&self, id: ProductId) -> bool {
        self.orders
            .values()
            .any(|order| order.items().iter().any(|item| item.product_id == id))
    }

    // Orders

    pub fn upsert_order(&mut self, order: Order) {
        self.orders.insert(order.id_typed(), order);
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn remove_order(&mut self, id: OrderId) -> Option<Order> {
        self.orders.remove(&id)
    }

    // Consolidated orders (write-once)

    pub fn insert_consolidated_order(&mut self, consolidated: ConsolidatedOrder) {
        self.consolidated_orders
            .insert(consolidated.id_typed(), consolidated);
    }

    pub fn consolidated_order(&self, id: ConsolidatedOrderId) -> Option<&ConsolidatedOrder> {
        self.consolidated_orders.get(&id)
    }

    pub fn consolidated_orders(&self) -> impl Iterator<Item = &ConsolidatedOrder> {
        self.consolidated_orders.values()
    }
}
