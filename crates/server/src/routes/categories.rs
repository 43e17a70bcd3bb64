//! Category routes: pass-through to the upstream catalog with
//! write-through caching.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use harborfront_core::CategoryId;

use crate::catalog::types::{self, CatalogCategory};
use crate::db::CatalogRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Mirror validated categories into the cache, best-effort.
async fn cache_categories(state: &AppState, categories: &[CatalogCategory]) {
    if categories.is_empty() {
        return;
    }

    if let Err(err) = CatalogRepository::new(state.pool())
        .upsert_categories(categories)
        .await
    {
        tracing::warn!(error = %err, "category cache write failed, serving upstream data anyway");
    }
}

/// List categories from the upstream catalog.
///
/// GET /api/categories
///
/// # Errors
///
/// Returns `Catalog` if the upstream call fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_current): RequireAuth,
) -> Result<Json<Value>> {
    let payload = state.catalog().list_categories().await?;

    cache_categories(&state, &types::collect_categories(&payload)).await;

    Ok(Json(payload))
}

/// Get one category from the upstream catalog.
///
/// GET /api/categories/{categoryId}
///
/// # Errors
///
/// Returns `Catalog` if the upstream call fails.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_current): RequireAuth,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Value>> {
    let payload = state.catalog().get_category(&category_id).await?;

    cache_categories(&state, &types::collect_categories(&payload)).await;

    Ok(Json(payload))
}

/// List the products belonging to a category.
///
/// GET /api/categories/subcategory/{categoryId}
///
/// # Errors
///
/// Returns `Catalog` if the upstream call fails.
pub async fn products_in_category(
    State(state): State<AppState>,
    RequireAuth(_current): RequireAuth,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Value>> {
    let payload = state.catalog().products_by_category(&category_id).await?;

    cache_categories(&state, &types::collect_categories(&payload)).await;

    Ok(Json(payload))
}
