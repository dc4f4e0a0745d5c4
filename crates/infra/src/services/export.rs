use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use petalflow_core::{DomainError, DomainResult};
use petalflow_consolidation::ConsolidatedOrderId;
use petalflow_orders::{OrderId, OrderStatus};
use petalflow_parties::PartyKind;
use petalflow_products::ProductId;

use crate::store::{StoreState, TransactionalStore};

/// Two-decimal money formatting for computed report totals. Stored decimal
/// values are exported via [`plain`]; only derived sums get display rounding.
fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

/// Minimal decimal representation: arithmetic scale (trailing zeros) is an
/// implementation detail and never part of the reporting output.
fn plain(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Human-facing short reference: first eight characters of the id.
fn order_number(id: impl core::fmt::Display) -> String {
    let id = id.to_string();
    id[..8].to_uppercase()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCustomer {
    pub name: String,
    pub email: String,
    pub role: PartyKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTotals {
    pub subtotal: String,
    pub discount: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedOrderProduct {
    pub sku: String,
    pub name: String,
    pub provider: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedOrderItem {
    pub product: ExportedOrderProduct,
    pub qty: i64,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderExportData {
    pub order_id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub consolidated_at: Option<DateTime<Utc>>,
    pub customer: ExportCustomer,
    pub totals: ExportTotals,
    pub items: Vec<ExportedOrderItem>,
}

/// Full detail of one order, for downstream reporting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderExport {
    pub export_type: String,
    pub export_date: DateTime<Utc>,
    pub data: OrderExportData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportProvider {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedConsolidatedProduct {
    pub sku: String,
    pub name: String,
    pub base_price: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedConsolidatedItem {
    pub product: ExportedConsolidatedProduct,
    pub total_qty: i64,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedTotals {
    pub total_items: usize,
    pub grand_total: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedOrderExportData {
    pub consolidated_order_id: ConsolidatedOrderId,
    pub order_number: String,
    pub created_at: DateTime<Utc>,
    pub provider: ExportProvider,
    pub items: Vec<ExportedConsolidatedItem>,
    pub totals: ConsolidatedTotals,
}

/// Supplier-facing detail of one consolidated shipment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedOrderExport {
    pub export_type: String,
    pub export_date: DateTime<Utc>,
    pub data: ConsolidatedOrderExportData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesLine {
    pub sku: String,
    pub name: String,
    pub provider: String,
    pub base_price: String,
    pub current_stock: i64,
    pub total_qty_sold: i64,
    pub total_revenue: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportSummary {
    pub total_products: usize,
    pub total_revenue: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportData {
    pub products: Vec<ProductSalesLine>,
    pub summary: SalesReportSummary,
}

/// Sales-by-product report across completed orders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesReport {
    pub export_type: String,
    pub export_date: DateTime<Utc>,
    pub data: SalesReportData,
}

/// Read-only projections for downstream reporting; derived purely from the
/// stored entities, no new invariants.
#[derive(Debug)]
pub struct ExportService<S> {
    store: S,
}

impl<S> ExportService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: TransactionalStore> ExportService<S> {
    pub fn export_order(&self, order_id: OrderId) -> DomainResult<OrderExport> {
        self.store.read(|state| {
            let order = state
                .order(order_id)
                .ok_or_else(|| DomainError::not_found("Order not found"))?;
            let customer = state
                .party(order.customer_id())
                .ok_or_else(|| DomainError::not_found("Party not found"))?;

            let mut items = Vec::with_capacity(order.items().len());
            for item in order.items() {
                let product = state
                    .product(item.product_id)
                    .ok_or_else(|| DomainError::not_found("Product not found"))?;
                let provider = state
                    .party(product.supplier_id())
                    .ok_or_else(|| DomainError::not_found("Party not found"))?;
                items.push(ExportedOrderItem {
                    product: ExportedOrderProduct {
                        sku: product.sku().to_string(),
                        name: product.name().to_string(),
                        provider: provider.name().to_string(),
                    },
                    qty: item.qty,
                    unit_price: plain(item.unit_price),
                    line_total: plain(item.line_total),
                });
            }
            items.sort_by(|a, b| a.product.name.cmp(&b.product.name));

            Ok(OrderExport {
                export_type: "ORDER".to_string(),
                export_date: Utc::now(),
                data: OrderExportData {
                    order_id: order.id_typed(),
                    order_number: order_number(order.id_typed()),
                    status: order.status(),
                    created_at: order.created_at(),
                    updated_at: order.updated_at(),
                    consolidated_at: order.consolidated_at(),
                    customer: ExportCustomer {
                        name: customer.name().to_string(),
                        email: customer.email().to_string(),
                        role: customer.kind(),
                    },
                    totals: ExportTotals {
                        subtotal: plain(order.subtotal()),
                        discount: plain(order.discount()),
                        total: plain(order.total()),
                    },
                    items,
                },
            })
        })
    }

    pub fn export_consolidated_order(
        &self,
        id: ConsolidatedOrderId,
    ) -> DomainResult<ConsolidatedOrderExport> {
        self.store.read(|state| {
            let consolidated = state
                .consolidated_order(id)
                .ok_or_else(|| DomainError::not_found("Consolidated order not found"))?;
            let provider = state
                .party(consolidated.supplier_id())
                .ok_or_else(|| DomainError::not_found("Party not found"))?;

            let mut items = Vec::with_capacity(consolidated.items().len());
            for item in consolidated.items() {
                let product = state
                    .product(item.product_id)
                    .ok_or_else(|| DomainError::not_found("Product not found"))?;
                items.push(ExportedConsolidatedItem {
                    product: ExportedConsolidatedProduct {
                        sku: product.sku().to_string(),
                        name: product.name().to_string(),
                        base_price: plain(product.base_price()),
                    },
                    total_qty: item.total_qty,
                    unit_price: plain(item.unit_price),
                    line_total: plain(item.line_total),
                });
            }
            items.sort_by(|a, b| a.product.name.cmp(&b.product.name));

            Ok(ConsolidatedOrderExport {
                export_type: "CONSOLIDATED_ORDER".to_string(),
                export_date: Utc::now(),
                data: ConsolidatedOrderExportData {
                    consolidated_order_id: consolidated.id_typed(),
                    order_number: order_number(consolidated.id_typed()),
                    created_at: consolidated.created_at(),
                    provider: ExportProvider {
                        name: provider.name().to_string(),
                        email: provider.email().to_string(),
                    },
                    totals: ConsolidatedTotals {
                        total_items: items.len(),
                        grand_total: money(consolidated.grand_total()),
                    },
                    items,
                },
            })
        })
    }

    pub fn export_product_sales_report(&self) -> DomainResult<ProductSalesReport> {
        self.store.read(|state| {
            let mut products: Vec<_> = state.products().collect();
            products.sort_by(|a, b| a.sku().cmp(b.sku()));

            let mut lines = Vec::with_capacity(products.len());
            let mut total_revenue = Decimal::ZERO;
            for product in products {
                let provider = state
                    .party(product.supplier_id())
                    .ok_or_else(|| DomainError::not_found("Party not found"))?;

                let (qty_sold, revenue) = completed_sales_for(state, product.id_typed());
                let revenue = revenue.round_dp(2);
                total_revenue += revenue;

                lines.push(ProductSalesLine {
                    sku: product.sku().to_string(),
                    name: product.name().to_string(),
                    provider: provider.name().to_string(),
                    base_price: plain(product.base_price()),
                    current_stock: product.stock(),
                    total_qty_sold: qty_sold,
                    total_revenue: money(revenue),
                });
            }

            Ok(ProductSalesReport {
                export_type: "PRODUCT_SALES_REPORT".to_string(),
                export_date: Utc::now(),
                data: SalesReportData {
                    summary: SalesReportSummary {
                        total_products: lines.len(),
                        total_revenue: money(total_revenue),
                    },
                    products: lines,
                },
            })
        })
    }
}

/// Quantity and revenue of a product across items of completed orders.
fn completed_sales_for(state: &StoreState, product_id: ProductId) -> (i64, Decimal) {
    let mut qty = 0i64;
    let mut revenue = Decimal::ZERO;
    for order in state.orders() {
        if order.status() != OrderStatus::Completed {
            continue;
        }
        for item in order.items() {
            if item.product_id == product_id {
                qty += item.qty;
                revenue += item.line_total;
            }
        }
    }
    (qty, revenue)
}
