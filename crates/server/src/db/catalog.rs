//! Catalog cache repository.
//!
//! Upserts keyed by external id, stamping `last_synced_at`. Rows absent
//! from later syncs are never deleted; the mirror is advisory and the
//! upstream stays authoritative.

use sqlx::PgPool;

use harborfront_core::ProductId;

use super::RepositoryError;
use crate::catalog::types::{CatalogCategory, CatalogProduct};
use crate::models::catalog::ProductRow;

/// Repository for the local product/category mirror.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a batch of products by external id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any upsert fails.
    pub async fn upsert_products(
        &self,
        products: &[CatalogProduct],
    ) -> Result<(), RepositoryError> {
        for product in products {
            sqlx::query(
                "INSERT INTO products \
                     (id, entity_id, name, sku, price, category_ids, image_url, description, \
                      last_synced_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now()) \
                 ON CONFLICT (id) DO UPDATE SET \
                     entity_id = EXCLUDED.entity_id, \
                     name = EXCLUDED.name, \
                     sku = EXCLUDED.sku, \
                     price = EXCLUDED.price, \
                     category_ids = EXCLUDED.category_ids, \
                     image_url = EXCLUDED.image_url, \
                     description = EXCLUDED.description, \
                     last_synced_at = now()",
            )
            .bind(&product.id)
            .bind(&product.entity_id)
            .bind(&product.name)
            .bind(&product.sku)
            .bind(product.price)
            .bind(product.category_ids.join(","))
            .bind(product.image_url.as_deref())
            .bind(product.description.as_deref())
            .execute(self.pool)
            .await?;
        }

        Ok(())
    }

    /// Upsert a batch of categories by external id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any upsert fails.
    pub async fn upsert_categories(
        &self,
        categories: &[CatalogCategory],
    ) -> Result<(), RepositoryError> {
        for category in categories {
            sqlx::query(
                "INSERT INTO categories \
                     (id, entity_id, name, url_key, has_children, parent_id, last_synced_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, now()) \
                 ON CONFLICT (id) DO UPDATE SET \
                     entity_id = EXCLUDED.entity_id, \
                     name = EXCLUDED.name, \
                     url_key = EXCLUDED.url_key, \
                     has_children = EXCLUDED.has_children, \
                     parent_id = EXCLUDED.parent_id, \
                     last_synced_at = now()",
            )
            .bind(&category.id)
            .bind(&category.entity_id)
            .bind(&category.name)
            .bind(category.url_key.as_deref())
            .bind(category.has_children)
            .bind(category.parent_id.as_deref())
            .execute(self.pool)
            .await?;
        }

        Ok(())
    }

    /// Get a cached product by external id. The order workflow uses
    /// this as its price source instead of a live upstream call per
    /// line item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(
        &self,
        id: &ProductId,
    ) -> Result<Option<ProductRow>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, entity_id, name, sku, price, category_ids, image_url, description, \
                    last_synced_at \
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}
