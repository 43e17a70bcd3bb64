//! Order repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use harborfront_core::{OrderId, OrderStatus, StoreId, UserId};

use super::RepositoryError;
use crate::models::order::{NewOrderItem, OrderHeaderRow, OrderItemDetailRow, OrderRow};

/// How an order listing or read is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// All orders, regardless of store.
    All,
    /// Only orders belonging to one store.
    Store(StoreId),
}

/// Repository for orders and their line items.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

const HEADER_SELECT: &str = "SELECT o.id, o.user_id, o.store_id, o.status, o.total_amount, \
            o.shipping_address, o.billing_address, o.created_at, o.updated_at, \
            s.name AS store_name, u.email AS user_email \
     FROM orders o \
     LEFT JOIN stores s ON o.store_id = s.id \
     LEFT JOIN users u ON o.user_id = u.id";

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order header and all its line items in one
    /// transaction. A failure on any item rolls back the header so a
    /// half-written order never survives.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn create(
        &self,
        user_id: UserId,
        store_id: StoreId,
        total_amount: Decimal,
        shipping_address: Option<&str>,
        billing_address: Option<&str>,
        items: &[NewOrderItem],
    ) -> Result<OrderRow, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders \
                 (user_id, store_id, status, total_amount, shipping_address, billing_address) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, user_id, store_id, status, total_amount, shipping_address, \
                       billing_address, created_at, updated_at",
        )
        .bind(user_id)
        .bind(store_id)
        .bind(OrderStatus::Pending)
        .bind(total_amount)
        .bind(shipping_address)
        .bind(billing_address)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price, total_price) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(order.id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    /// List order headers within a scope, newest first, optionally
    /// filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        scope: OrderScope,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderHeaderRow>, RepositoryError> {
        let mut sql = String::from(HEADER_SELECT);
        sql.push_str(" WHERE ($1::int IS NULL OR o.store_id = $1)");
        sql.push_str(" AND ($2::text IS NULL OR o.status = $2)");
        sql.push_str(" ORDER BY o.created_at DESC");

        let store_id = match scope {
            OrderScope::All => None,
            OrderScope::Store(id) => Some(id),
        };

        let rows = sqlx::query_as::<_, OrderHeaderRow>(&sql)
            .bind(store_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// Get one order header by id. Access scoping is the caller's job;
    /// this returns the row regardless of store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderHeaderRow>, RepositoryError> {
        let sql = format!("{HEADER_SELECT} WHERE o.id = $1");

        let row = sqlx::query_as::<_, OrderHeaderRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row)
    }

    /// List an order's line items joined to current product display
    /// metadata. Prices on each row remain the creation-time snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItemDetailRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemDetailRow>(
            "SELECT i.id, i.order_id, i.product_id, i.quantity, i.unit_price, i.total_price, \
                    i.created_at, \
                    p.name AS product_name, p.sku AS product_sku, p.image_url AS product_image \
             FROM order_items i \
             LEFT JOIN products p ON i.product_id = p.id \
             WHERE i.order_id = $1 \
             ORDER BY i.id ASC",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Write an order's new status.
    ///
    /// Transition legality is decided by the caller; this only touches
    /// the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderRow, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "UPDATE orders SET status = $1, updated_at = now() WHERE id = $2 \
             RETURNING id, user_id, store_id, status, total_amount, shipping_address, \
                       billing_address, created_at, updated_at",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row)
    }
}
