//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register               - Register (returns token pair)
//! POST /api/auth/login                  - Login (returns token pair)
//! POST /api/auth/refresh-token          - Rotate a refresh token
//! POST /api/auth/forgot-password        - Create a password reset token
//! POST /api/auth/reset-password         - Change password (requires auth)
//! POST /api/auth/logout                 - Revoke a refresh token
//! GET  /api/auth/profile                - Profile with store (requires auth)
//!
//! # Catalog pass-through (requires auth, write-through cached)
//! GET  /api/products                    - List products (paged)
//! GET  /api/products/{productId}        - Product detail
//! GET  /api/categories                  - List categories
//! GET  /api/categories/{categoryId}     - Category detail
//! GET  /api/categories/subcategory/{categoryId} - Products in a category
//!
//! # Stores (requires auth)
//! POST /api/stores                      - Create store (affiliates creator)
//! GET  /api/stores                      - List stores (all for admins)
//! GET  /api/stores/{storeId}            - Store detail with members
//! PUT  /api/stores/{storeId}            - Partial update
//! POST /api/stores/{storeId}/users      - Add member (admin)
//! DELETE /api/stores/{storeId}/users/{userId} - Remove member (admin)
//!
//! # Orders (requires auth, store-scoped)
//! POST /api/orders                      - Place an order
//! GET  /api/orders                      - List orders (?status= filter)
//! GET  /api/orders/{orderId}            - Order detail with items
//! PUT  /api/orders/{orderId}/status     - Transition order status
//! ```

pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;
pub mod stores;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh-token", post(auth::refresh_token))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{productId}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{categoryId}", get(categories::show))
        .route(
            "/subcategory/{categoryId}",
            get(categories::products_in_category),
        )
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(stores::create).get(stores::index))
        .route("/{storeId}", get(stores::show).put(stores::update))
        .route("/{storeId}/users", post(stores::add_member))
        .route("/{storeId}/users/{userId}", delete(stores::remove_member))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/{orderId}", get(orders::show))
        .route("/{orderId}/status", put(orders::update_status))
}

/// Create all API routes, nested under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .nest("/auth", auth_routes())
            .nest("/products", product_routes())
            .nest("/categories", category_routes())
            .nest("/stores", store_routes())
            .nest("/orders", order_routes()),
    )
}
