use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use petalflow_core::{AggregateId, AggregateRoot, DomainError, DomainResult, Entity};
use petalflow_parties::PartyId;
use petalflow_pricing::{price_line, PricingTier};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Partial update to a product; `None` keeps the existing value.
///
/// SKU uniqueness across the catalog is enforced by the directory service,
/// which owns the catalog-wide view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub base_price: Option<Decimal>,
    pub stock: Option<i64>,
}

/// Aggregate root: Product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    base_price: Decimal,
    stock: i64,
    supplier_id: PartyId,
    /// Kept sorted by ascending `min_qty`.
    pricing_tiers: Vec<PricingTier>,
    version: u64,
}

impl Product {
    pub fn create(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        base_price: Decimal,
        stock: i64,
        supplier_id: PartyId,
        pricing_tiers: Vec<PricingTier>,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();

        if sku.trim().is_empty() {
            return Err(DomainError::invalid_argument("SKU cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::invalid_argument("name cannot be empty"));
        }
        if base_price < Decimal::ZERO {
            return Err(DomainError::invalid_argument(
                "base price cannot be negative",
            ));
        }
        if stock < 0 {
            return Err(DomainError::invalid_argument("stock cannot be negative"));
        }

        let pricing_tiers = Self::validated_tiers(pricing_tiers)?;

        Ok(Self {
            id,
            sku,
            name,
            base_price,
            stock,
            supplier_id,
            pricing_tiers,
            version: 1,
        })
    }

    fn validated_tiers(mut tiers: Vec<PricingTier>) -> DomainResult<Vec<PricingTier>> {
        for tier in &tiers {
            tier.validate()?;
        }
        tiers.sort_by_key(|t| t.min_qty);
        Ok(tiers)
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn supplier_id(&self) -> PartyId {
        self.supplier_id
    }

    pub fn pricing_tiers(&self) -> &[PricingTier] {
        &self.pricing_tiers
    }

    /// Unit price for `quantity` units at the product's current base price
    /// and tier list. Orders snapshot the result; later catalog changes do
    /// not touch already-priced lines.
    pub fn unit_price_for(&self, quantity: i64) -> DomainResult<Decimal> {
        price_line(self.base_price, quantity, &self.pricing_tiers)
    }

    /// Apply a partial update.
    pub fn update(&mut self, changes: ProductUpdate) -> DomainResult<()> {
        if let Some(sku) = changes.sku {
            if sku.trim().is_empty() {
                return Err(DomainError::invalid_argument("SKU cannot be empty"));
            }
            self.sku = sku;
        }
        if let Some(name) = changes.name {
            if name.trim().is_empty() {
                return Err(DomainError::invalid_argument("name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(base_price) = changes.base_price {
            if base_price < Decimal::ZERO {
                return Err(DomainError::invalid_argument(
                    "base price cannot be negative",
                ));
            }
            self.base_price = base_price;
        }
        if let Some(stock) = changes.stock {
            if stock < 0 {
                return Err(DomainError::invalid_argument("stock cannot be negative"));
            }
            self.stock = stock;
        }
        self.version += 1;
        Ok(())
    }

    /// Replace the volume-discount tier list.
    pub fn replace_pricing_tiers(&mut self, tiers: Vec<PricingTier>) -> DomainResult<()> {
        self.pricing_tiers = Self::validated_tiers(tiers)?;
        self.version += 1;
        Ok(())
    }

    /// Check that `required` units are on hand, without mutating anything.
    pub fn ensure_stock(&self, required: i64) -> DomainResult<()> {
        if self.stock < required {
            return Err(DomainError::insufficient_stock(
                self.name.clone(),
                self.stock,
                required,
            ));
        }
        Ok(())
    }

    /// Deduct fulfilled quantity from stock. Stock never goes negative.
    pub fn deduct_stock(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity < 1 {
            return Err(DomainError::invalid_argument("quantity must be at least 1"));
        }
        self.ensure_stock(quantity)?;
        self.stock -= quantity;
        self.version += 1;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Product {
    fn version(&self) -> u64 {
        self.version
    }
}
