//! Upstream catalog client and payload schema.
//!
//! The upstream is authoritative; this module fetches its JSON,
//! validates records into typed shapes for the local mirror, and
//! passes the raw payload back to the caller unchanged. Cache writes
//! driven by these payloads are best-effort and never fail the read
//! that triggered them.

use thiserror::Error;

pub mod client;
pub mod types;

pub use client::CatalogClient;

/// Errors from upstream catalog calls.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("catalog returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),
}
