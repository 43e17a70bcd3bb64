//! Catalog cache rows.
//!
//! These mirror the upstream catalog and are advisory: the upstream is
//! authoritative, rows are upserted on every read-through and never
//! deleted when they disappear upstream.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use harborfront_core::ProductId;

/// A cached product row. The order workflow reads these for its price
/// snapshots; categories are mirrored write-only and never read back.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: ProductId,
    pub entity_id: String,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub category_ids: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub last_synced_at: DateTime<Utc>,
}
