//! Authentication extractor.
//!
//! Validates the bearer access token, then re-reads the live user row.
//! Authorization decisions run against the current role and store
//! affiliation, not the claims, so a role change or store move takes
//! effect on the next request instead of at token expiry.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::user::UserRow;
use crate::services::auth::AuthError;
use crate::services::authz::PermissionContext;
use crate::state::AppState;

/// The authenticated caller: live user row plus derived permissions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserRow,
    pub ctx: PermissionContext,
}

/// Extractor that requires a valid bearer access token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(current): RequireAuth) -> impl IntoResponse {
///     format!("hello, {}", current.user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let claims = state.tokens().verify(token)?;

        // The token proves identity only; re-fetch the row so revoked or
        // re-scoped accounts are caught immediately.
        let user = UserRepository::new(state.pool())
            .get_by_id(claims.sub)
            .await?
            .ok_or(AppError::Auth(AuthError::TokenInvalid))?;

        let ctx = PermissionContext::from(&user);
        Ok(Self(CurrentUser { user, ctx }))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .uri("/api/orders")
            .header(header::AUTHORIZATION, value)
            .body(())
            .expect("request")
            .into_parts();
        parts
    }

    #[test]
    fn bearer_token_is_extracted() {
        let parts = parts_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let parts = parts_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn empty_bearer_value_is_rejected() {
        let parts = parts_with_auth("Bearer ");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn missing_header_yields_none() {
        let (parts, ()) = Request::builder()
            .uri("/api/orders")
            .body(())
            .expect("request")
            .into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
