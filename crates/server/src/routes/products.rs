//! Product routes: pass-through to the upstream catalog with
//! write-through caching.
//!
//! The upstream payload is returned to the caller unchanged. Validated
//! records are mirrored into the local cache; a cache failure is logged
//! and never fails the read.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use harborfront_core::ProductId;

use crate::catalog::types::{self, CatalogProduct};
use crate::db::CatalogRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Mirror validated products into the cache, best-effort.
async fn cache_products(state: &AppState, products: &[CatalogProduct]) {
    if products.is_empty() {
        return;
    }

    if let Err(err) = CatalogRepository::new(state.pool())
        .upsert_products(products)
        .await
    {
        tracing::warn!(error = %err, "product cache write failed, serving upstream data anyway");
    }
}

/// List products from the upstream catalog, paged.
///
/// GET /api/products
///
/// # Errors
///
/// Returns `Catalog` if the upstream call fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_current): RequireAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);

    let payload = state.catalog().list_products(page, limit).await?;

    cache_products(&state, &types::collect_products(&payload)).await;

    Ok(Json(payload))
}

/// Get one product from the upstream catalog.
///
/// GET /api/products/{productId}
///
/// # Errors
///
/// Returns `Catalog` if the upstream call fails.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_current): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Value>> {
    let payload = state.catalog().get_product(&product_id).await?;

    cache_products(&state, &types::collect_products(&payload)).await;

    Ok(Json(payload))
}
