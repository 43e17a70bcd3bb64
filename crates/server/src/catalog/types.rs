//! Typed views over upstream catalog payloads.
//!
//! The upstream is loosely typed: products arrive as an object keyed by
//! product id, categories as an array, and scalar fields show up as
//! strings or numbers depending on the record. Records without a usable
//! `entity_id` or `price` are skipped with a warning rather than
//! written best-effort.

use rust_decimal::Decimal;
use serde_json::Value;

use harborfront_core::{CategoryId, ProductId};

/// A validated product record ready for the mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub entity_id: String,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub category_ids: Vec<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// A validated category record ready for the mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCategory {
    pub id: CategoryId,
    pub entity_id: String,
    pub name: String,
    pub url_key: Option<String>,
    pub has_children: bool,
    pub parent_id: Option<String>,
}

/// Extract validated products from a keyed-object payload.
///
/// Non-object payloads and entries without an `entity_id` or a
/// parseable `price` are dropped with a warning; everything else
/// becomes a `CatalogProduct`.
#[must_use]
pub fn collect_products(payload: &Value) -> Vec<CatalogProduct> {
    let Some(map) = payload.as_object() else {
        tracing::warn!("product payload is not a keyed object, nothing to cache");
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, record)| parse_product(key, record))
        .collect()
}

fn parse_product(key: &str, record: &Value) -> Option<CatalogProduct> {
    let Some(entity_id) = record.get("entity_id").and_then(scalar_string) else {
        tracing::warn!(product = key, "skipping product record without entity_id");
        return None;
    };

    // The cached price is the order-time unit price; a record whose
    // price can't be read must not enter the mirror at all.
    let Some(price) = record
        .get("price")
        .and_then(scalar_string)
        .and_then(|raw| raw.parse::<Decimal>().ok())
    else {
        tracing::warn!(product = key, "skipping product record without a usable price");
        return None;
    };

    let category_ids = record
        .get("category_ids")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(scalar_string).collect())
        .unwrap_or_default();

    Some(CatalogProduct {
        id: ProductId::from(key),
        entity_id,
        name: record.get("name").and_then(scalar_string).unwrap_or_default(),
        sku: record.get("sku").and_then(scalar_string).unwrap_or_default(),
        price,
        category_ids,
        image_url: record
            .get("default_image")
            .and_then(scalar_string)
            .filter(|url| !url.is_empty()),
        description: record.get("description").and_then(scalar_string),
    })
}

/// Extract validated categories from an array payload.
#[must_use]
pub fn collect_categories(payload: &Value) -> Vec<CatalogCategory> {
    let Some(items) = payload.as_array() else {
        tracing::warn!("category payload is not an array, nothing to cache");
        return Vec::new();
    };

    items.iter().filter_map(parse_category).collect()
}

fn parse_category(record: &Value) -> Option<CatalogCategory> {
    let Some(entity_id) = record.get("entity_id").and_then(scalar_string) else {
        tracing::warn!("skipping category record without entity_id");
        return None;
    };

    Some(CatalogCategory {
        id: CategoryId::from(entity_id.clone()),
        entity_id,
        name: record.get("name").and_then(scalar_string).unwrap_or_default(),
        url_key: record.get("url_key").and_then(scalar_string),
        has_children: record
            .get("has_children")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        parent_id: record.get("parent_id").and_then(scalar_string),
    })
}

/// Upstream scalars come as strings or numbers interchangeably.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn keyed_product_map_is_collected() {
        let payload = json!({
            "SKU-1": {
                "entity_id": 101,
                "name": "Deck Chair",
                "sku": "SKU-1",
                "price": "49.90",
                "category_ids": [3, "7"],
                "default_image": "https://cdn.example/chair.jpg"
            }
        });

        let products = collect_products(&payload);
        assert_eq!(products.len(), 1);
        let p = &products[0];
        assert_eq!(p.id, ProductId::new("SKU-1"));
        assert_eq!(p.entity_id, "101");
        assert_eq!(p.price, dec!(49.90));
        assert_eq!(p.category_ids, vec!["3".to_string(), "7".to_string()]);
    }

    #[test]
    fn record_without_entity_id_is_skipped() {
        let payload = json!({
            "SKU-1": { "name": "No entity id here", "price": "9.99" },
            "SKU-2": { "entity_id": "202", "name": "Kept", "sku": "SKU-2", "price": 5 }
        });

        let products = collect_products(&payload);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, ProductId::new("SKU-2"));
        assert_eq!(products[0].price, dec!(5));
    }

    #[test]
    fn record_with_unusable_price_is_skipped() {
        let payload = json!({
            "SKU-1": { "entity_id": "1", "price": "not-a-price" },
            "SKU-2": { "entity_id": "2" },
            "SKU-3": { "entity_id": "3", "price": "12.50" }
        });

        let products = collect_products(&payload);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, ProductId::new("SKU-3"));
        assert_eq!(products[0].price, dec!(12.50));
    }

    #[test]
    fn non_object_product_payload_yields_nothing() {
        assert!(collect_products(&json!([1, 2, 3])).is_empty());
        assert!(collect_products(&json!("nope")).is_empty());
    }

    #[test]
    fn category_array_is_collected() {
        let payload = json!([
            { "entity_id": 5, "name": "Outdoor", "url_key": "outdoor", "has_children": true },
            { "name": "missing entity id" }
        ]);

        let categories = collect_categories(&payload);
        assert_eq!(categories.len(), 1);
        let c = &categories[0];
        assert_eq!(c.id, CategoryId::new("5"));
        assert_eq!(c.url_key.as_deref(), Some("outdoor"));
        assert!(c.has_children);
        assert_eq!(c.parent_id, None);
    }

    #[test]
    fn empty_image_is_treated_as_absent() {
        let payload = json!({
            "SKU-1": { "entity_id": "1", "price": "9.99", "default_image": "" }
        });

        assert_eq!(collect_products(&payload)[0].image_url, None);
    }
}
