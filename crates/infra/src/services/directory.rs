use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use petalflow_core::{AggregateId, DomainError, DomainResult};
use petalflow_parties::{Party, PartyId, PartyKind};
use petalflow_pricing::PricingTier;
use petalflow_products::{Product, ProductId, ProductUpdate};

use crate::store::TransactionalStore;

/// Input for product registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub base_price: Decimal,
    pub stock: i64,
    pub supplier_id: PartyId,
    pub pricing_tiers: Vec<PricingTier>,
}

/// Party and product directory administration.
#[derive(Debug)]
pub struct DirectoryService<S> {
    store: S,
}

impl<S> DirectoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: TransactionalStore> DirectoryService<S> {
    pub fn register_party(
        &self,
        kind: PartyKind,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> DomainResult<Party> {
        let name = name.into();
        let email = email.into();

        self.store.transaction(|state| {
            if state.party_by_email(&email).is_some() {
                return Err(DomainError::invalid_argument("Email already exists"));
            }

            let party = Party::register(PartyId::new(AggregateId::new()), kind, name, email)?;
            state.upsert_party(party.clone());
            info!(party_id = %party.id_typed(), kind = ?party.kind(), "party registered");
            Ok(party)
        })
    }

    pub fn update_party_details(
        &self,
        party_id: PartyId,
        name: Option<String>,
        email: Option<String>,
    ) -> DomainResult<Party> {
        self.store.transaction(|state| {
            if let Some(email) = email.as_deref() {
                if state
                    .party_by_email(email)
                    .is_some_and(|p| p.id_typed() != party_id)
                {
                    return Err(DomainError::invalid_argument("Email already exists"));
                }
            }

            let party = state
                .party_mut(party_id)
                .ok_or_else(|| DomainError::not_found("Party not found"))?;
            party.update_details(name, email)?;
            Ok(party.clone())
        })
    }

    pub fn suspend_party(&self, party_id: PartyId) -> DomainResult<Party> {
        self.store.transaction(|state| {
            let party = state
                .party_mut(party_id)
                .ok_or_else(|| DomainError::not_found("Party not found"))?;
            party.suspend()?;
            info!(party_id = %party_id, "party suspended");
            Ok(party.clone())
        })
    }

    pub fn find_party(&self, party_id: PartyId) -> DomainResult<Party> {
        self.store.read(|state| {
            state
                .party(party_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Party not found"))
        })
    }

    pub fn list_parties(&self, kind: Option<PartyKind>) -> DomainResult<Vec<Party>> {
        self.store.read(|state| {
            let mut parties: Vec<Party> = state
                .parties()
                .filter(|p| kind.is_none_or(|k| p.kind() == k))
                .cloned()
                .collect();
            parties.sort_by(|a, b| a.name().cmp(b.name()));
            Ok(parties)
        })
    }

    /// Register a product under a supplier.
    ///
    /// The supplier reference must resolve to an active supplier-kind party,
    /// and the SKU must be unique across the catalog.
    pub fn create_product(&self, input: NewProduct) -> DomainResult<Product> {
        self.store.transaction(|state| {
            let supplier = state
                .party_of_kind(input.supplier_id, PartyKind::Supplier)
                .ok_or_else(|| {
                    DomainError::invalid_argument("Provider not found or invalid role")
                })?;
            if !supplier.can_transact() {
                return Err(DomainError::invalid_state("Provider is suspended"));
            }

            if state.product_by_sku(&input.sku).is_some() {
                return Err(DomainError::invalid_argument("SKU already exists"));
            }

            let product = Product::create(
                ProductId::new(AggregateId::new()),
                input.sku,
                input.name,
                input.base_price,
                input.stock,
                input.supplier_id,
                input.pricing_tiers,
            )?;
            state.upsert_product(product.clone());
            info!(product_id = %product.id_typed(), sku = product.sku(), "product created");
            Ok(product)
        })
    }

    pub fn update_product(
        &self,
        product_id: ProductId,
        changes: ProductUpdate,
    ) -> DomainResult<Product> {
        self.store.transaction(|state| {
            if state.product(product_id).is_none() {
                return Err(DomainError::not_found("Product not found"));
            }

            if let Some(sku) = changes.sku.as_deref() {
                if state
                    .product_by_sku(sku)
                    .is_some_and(|p| p.id_typed() != product_id)
                {
                    return Err(DomainError::invalid_argument("SKU already exists"));
                }
            }

            let product = state
                .product_mut(product_id)
                .ok_or_else(|| DomainError::not_found("Product not found"))?;
            product.update(changes)?;
            Ok(product.clone())
        })
    }

    pub fn replace_pricing_tiers(
        &self,
        product_id: ProductId,
        tiers: Vec<PricingTier>,
    ) -> DomainResult<Product> {
        self.store.transaction(|state| {
            let product = state
                .product_mut(product_id)
                .ok_or_else(|| DomainError::not_found("Product not found"))?;
            product.replace_pricing_tiers(tiers)?;
            Ok(product.clone())
        })
    }

    /// Delete a product that no order references.
    pub fn remove_product(&self, product_id: ProductId) -> DomainResult<()> {
        self.store.transaction(|state| {
            if state.product(product_id).is_none() {
                return Err(DomainError::not_found("Product not found"));
            }
            if state.product_is_referenced(product_id) {
                return Err(DomainError::invalid_state(
                    "Cannot delete product with existing order items",
                ));
            }
            state.remove_product(product_id);
            Ok(())
        })
    }

    pub fn find_product(&self, product_id: ProductId) -> DomainResult<Product> {
        self.store.read(|state| {
            state
                .product(product_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Product not found"))
        })
    }

    pub fn list_products(&self) -> DomainResult<Vec<Product>> {
        self.store.read(|state| {
            let mut products: Vec<Product> = state.products().cloned().collect();
            products.sort_by(|a, b| a.name().cmp(b.name()));
            Ok(products)
        })
    }
}
