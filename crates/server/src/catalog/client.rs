//! HTTP client for the upstream catalog API.
//!
//! Authentication is a set of static query-string credentials appended
//! to every request. Responses are returned as raw JSON so handlers can
//! pass them through unchanged while the cache layer extracts what it
//! understands.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde_json::Value;

use harborfront_core::{CategoryId, ProductId};

use super::CatalogError;
use crate::config::CatalogApiConfig;

/// Client for the upstream catalog API.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    oauth_params: Vec<(String, String)>,
}

impl CatalogClient {
    /// Build a client from catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the underlying client cannot be
    /// constructed.
    pub fn new(config: &CatalogApiConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            oauth_params: config
                .oauth_params
                .iter()
                .map(|(name, value)| (name.clone(), value.expose_secret().to_string()))
                .collect(),
        })
    }

    /// List products, paged.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport failure or non-success
    /// status.
    pub async fn list_products(&self, page: u32, limit: u32) -> Result<Value, CatalogError> {
        self.get_json(
            "/products",
            &[
                ("page", page.to_string()),
                ("limit", limit.to_string()),
                ("pageinfo", "1".to_string()),
            ],
        )
        .await
    }

    /// Get one product by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport failure or non-success
    /// status.
    pub async fn get_product(&self, id: &ProductId) -> Result<Value, CatalogError> {
        self.get_json(&format!("/products/{id}"), &[]).await
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport failure or non-success
    /// status.
    pub async fn list_categories(&self) -> Result<Value, CatalogError> {
        self.get_json("/categories", &[]).await
    }

    /// Get one category by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport failure or non-success
    /// status.
    pub async fn get_category(&self, id: &CategoryId) -> Result<Value, CatalogError> {
        self.get_json(&format!("/category/{id}"), &[]).await
    }

    /// List the products belonging to a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport failure or non-success
    /// status.
    pub async fn products_by_category(&self, id: &CategoryId) -> Result<Value, CatalogError> {
        self.get_json("/categories", &[("category_id", id.to_string())])
            .await
    }

    async fn get_json(
        &self,
        path: &str,
        extra_params: &[(&str, String)],
    ) -> Result<Value, CatalogError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .query(&self.oauth_params)
            .query(extra_params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "upstream catalog returned an error status");
            return Err(CatalogError::UpstreamStatus(status));
        }

        Ok(response.json().await?)
    }
}
