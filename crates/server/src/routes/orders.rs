//! Order routes.
//!
//! Creation snapshots unit prices from the catalog cache and persists
//! the header plus all line items in one transaction. Listing and reads
//! are scoped to the caller's store unless they are an admin. Status
//! changes go through the enforced transition graph.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use harborfront_core::{OrderId, OrderStatus, ProductId};

use crate::db::{CatalogRepository, OrderRepository, OrderScope};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::order::{OrderDetail, OrderHeaderRow, OrderItemDetailRow, OrderRow};
use crate::services::authz::PermissionContext;
use crate::services::orders::{apply_status_change, order_total, price_item};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub product_id: ProductId,
    // Optional at the wire so an omitted quantity fails as invalid
    // input, not as a body-deserialization rejection.
    pub quantity: Option<i32>,
}

/// Pull the quantity out of a request item.
fn item_quantity(item: &ItemRequest) -> Result<i32> {
    item.quantity.ok_or_else(|| {
        AppError::InvalidInput(format!(
            "quantity is required for product {}",
            item.product_id
        ))
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<ItemRequest>,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub message: String,
    pub order: OrderRow,
    pub items: Vec<OrderItemDetailRow>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderDetail>,
}

#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    pub order: OrderDetail,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub message: String,
    pub order: OrderRow,
}

/// Deny access to orders outside the caller's store.
fn check_order_access(ctx: &PermissionContext, header: &OrderHeaderRow) -> Result<()> {
    match header.order.store_id {
        Some(store_id) => ctx.require_store(store_id),
        // Orphaned order (store row deleted): admins only.
        None => ctx.require_admin(),
    }
}

/// Place an order.
///
/// POST /api/orders
///
/// Each line item's unit price is the cached catalog price at this
/// instant; the order total is the exact sum of line totals.
///
/// # Errors
///
/// Returns `InvalidInput` for a storeless caller, an empty item list,
/// or a missing or non-positive quantity; `NotFound` naming the first
/// product absent from the cache.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>)> {
    let store_id = current.ctx.store_id.ok_or_else(|| {
        AppError::InvalidInput("user does not belong to a store".to_string())
    })?;

    if req.items.is_empty() {
        return Err(AppError::InvalidInput("order items are required".to_string()));
    }

    let catalog = CatalogRepository::new(state.pool());
    let mut items = Vec::with_capacity(req.items.len());
    for item in &req.items {
        let quantity = item_quantity(item)?;

        let product = catalog.get_product(&item.product_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("product with ID {} not found", item.product_id))
        })?;

        items.push(price_item(product.id, product.price, quantity)?);
    }

    let total_amount = order_total(&items);

    let repo = OrderRepository::new(state.pool());
    let order = repo
        .create(
            current.user.id,
            store_id,
            total_amount,
            req.shipping_address.as_deref(),
            req.billing_address.as_deref(),
            &items,
        )
        .await?;

    let items = repo.items(order.id).await?;

    tracing::info!(order_id = %order.id, store_id = %store_id, total = %total_amount, "order placed");

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            message: "Order created successfully".to_string(),
            order,
            items,
        }),
    ))
}

/// List orders with their items, newest first.
///
/// GET /api/orders?status=...
///
/// Admins see every order; everyone else sees only their store's. A
/// storeless caller gets an empty list.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown status filter.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<OrderListResponse>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let scope = if current.ctx.role.is_admin() {
        OrderScope::All
    } else {
        match current.ctx.store_id {
            Some(store_id) => OrderScope::Store(store_id),
            None => return Ok(Json(OrderListResponse { orders: Vec::new() })),
        }
    };

    let repo = OrderRepository::new(state.pool());
    let headers = repo.list(scope, status).await?;

    let mut orders = Vec::with_capacity(headers.len());
    for header in headers {
        let items = repo.items(header.order.id).await?;
        orders.push(OrderDetail { header, items });
    }

    Ok(Json(OrderListResponse { orders }))
}

/// Get one order with its items.
///
/// GET /api/orders/{orderId}
///
/// # Errors
///
/// Returns `NotFound` for an unknown order, `Forbidden` for an order
/// outside the caller's store.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderDetailResponse>> {
    let repo = OrderRepository::new(state.pool());

    let header = repo
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

    check_order_access(&current.ctx, &header)?;

    let items = repo.items(order_id).await?;

    Ok(Json(OrderDetailResponse {
        order: OrderDetail { header, items },
    }))
}

/// Transition an order to a new status.
///
/// PUT /api/orders/{orderId}/status
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown status token or an illegal
/// transition, `Forbidden` when a non-admin requests approve/reject or
/// touches an order outside their store.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(order_id): Path<OrderId>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>> {
    let repo = OrderRepository::new(state.pool());

    let header = repo
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

    check_order_access(&current.ctx, &header)?;

    let next = apply_status_change(header.order.status, &req.status, &current.ctx)?;
    let order = repo.update_status(order_id, next).await?;

    tracing::info!(order_id = %order_id, from = %header.order.status, to = %next, "order status updated");

    Ok(Json(UpdateStatusResponse {
        message: "Order status updated successfully".to_string(),
        order,
    }))
}
