//! Unified error handling.
//!
//! Provides a single `AppError` type mapping every failure class to an
//! HTTP status and a JSON `{"message": ...}` body. All route handlers
//! return `Result<T, AppError>`. Server-side failures are logged and
//! reported to the client as an opaque message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing request data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Uniqueness or invariant violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced entity absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, invalid, or expired credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted for this resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Upstream catalog call failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Authentication plumbing failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        // Repository conflict/not-found carry domain meaning; keep them
        // client-visible instead of collapsing into a 500.
        match err {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::NotFound => Self::NotFound("resource not found".to_string()),
            other => Self::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::Internal(_) | Self::Catalog(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Catalog(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::TokenExpired | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
                AuthError::Hashing(_) | AuthError::Signing(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Server error".to_string(),
            Self::Catalog(_) => "Upstream catalog error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::TokenExpired => "Token expired".to_string(),
                AuthError::TokenInvalid => "Invalid token".to_string(),
                AuthError::Hashing(_) | AuthError::Signing(_) => "Server error".to_string(),
            },
            Self::InvalidInput(msg)
            | Self::Conflict(msg)
            | Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg) => msg.clone(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn error_display() {
        let err = AppError::NotFound("product SKU-1".to_string());
        assert_eq!(err.to_string(), "Not found: product SKU-1");
    }

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(
            status_of(AppError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Conflict("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Unauthorized("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Forbidden("x".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn expired_token_is_unauthorized() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::TokenExpired)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn repository_conflict_surfaces_as_conflict() {
        let err: AppError = RepositoryError::Conflict("email already exists".to_string()).into();
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }
}
