//! Order row and response types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use harborfront_core::{Email, OrderId, OrderItemId, OrderStatus, ProductId, StoreId, UserId};

/// An order header row.
///
/// `total_amount` and the addresses are immutable after creation; only
/// `status` moves, through the transition graph in `OrderStatus`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderRow {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub store_id: Option<StoreId>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item row. Immutable after creation; `unit_price` is the
/// catalog price snapshot taken when the order was placed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRow {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A line item joined to current product display metadata.
///
/// The name/sku/image reflect the cache at read time; the prices remain
/// the snapshot taken at order creation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetailRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: OrderItemRow,
    pub product_name: Option<String>,
    pub product_sku: Option<String>,
    pub product_image: Option<String>,
}

/// An order header joined to its store and owner for display.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderHeaderRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: OrderRow,
    pub store_name: Option<String>,
    pub user_email: Option<Email>,
}

/// Full order response: header plus line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: OrderHeaderRow,
    pub items: Vec<OrderItemDetailRow>,
}

/// A validated, priced line item awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}
