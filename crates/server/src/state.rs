//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::AppConfig;
use crate::services::auth::TokenIssuer;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the database pool, the upstream
/// catalog client, and the access-token issuer.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    catalog: CatalogClient,
    tokens: TokenIssuer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the upstream catalog client cannot be
    /// constructed.
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let tokens = TokenIssuer::new(&config.jwt_secret, config.access_token_ttl_secs);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                tokens,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the upstream catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the access-token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }
}
