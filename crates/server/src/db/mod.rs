//! Database operations for the Harborfront `PostgreSQL` store.
//!
//! The relational store is the single source of truth for local data
//! (users, stores, orders, credentials) and holds an advisory mirror of
//! the upstream catalog (`products`, `categories`).
//!
//! Repositories borrow a `PgPool` and use the runtime query API; rows
//! decode into `FromRow` structs in `crate::models`. Unique violations
//! map to `RepositoryError::Conflict`.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are embedded via
//! `sqlx::migrate!`, applied at startup.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod catalog;
pub mod orders;
pub mod stores;
pub mod tokens;
pub mod users;

pub use catalog::CatalogRepository;
pub use orders::{OrderRepository, OrderScope};
pub use stores::StoreRepository;
pub use tokens::{PasswordResetTokenRepository, RefreshTokenRepository};
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Uniqueness or invariant violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Row absent where one was required.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}
