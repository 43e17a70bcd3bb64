//! Store routes.
//!
//! Store creation affiliates the creator in the same transaction that
//! inserts the store, so the one-store-per-user invariant can't be
//! bypassed by interleaved requests. Membership management is
//! admin-only.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use harborfront_core::{Email, StoreId, UserId};

use crate::db::{StoreRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::store::{StoreMember, StoreRow};
use crate::models::user::{PublicUser, UserRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    pub message: String,
    pub store: StoreRow,
}

#[derive(Debug, Serialize)]
pub struct StoreListResponse {
    pub stores: Vec<StoreRow>,
}

#[derive(Debug, Serialize)]
pub struct StoreDetailResponse {
    pub store: StoreRow,
    pub users: Vec<StoreMember>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create a store and affiliate the creator with it.
///
/// POST /api/stores
///
/// # Errors
///
/// Returns `Conflict` if the caller already belongs to a store.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<StoreResponse>)> {
    if req.name.trim().is_empty() {
        return Err(AppError::InvalidInput("store name is required".to_string()));
    }

    let store = StoreRepository::new(state.pool())
        .create_with_owner(req.name.trim(), req.description.as_deref(), current.user.id)
        .await?;

    tracing::info!(store_id = %store.id, owner = %current.user.id, "store created");

    Ok((
        StatusCode::CREATED,
        Json(StoreResponse {
            message: "Store created successfully".to_string(),
            store,
        }),
    ))
}

/// List stores: all of them for admins, the caller's own otherwise.
///
/// GET /api/stores
///
/// # Errors
///
/// Returns `Database` on storage failure.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<StoreListResponse>> {
    let repo = StoreRepository::new(state.pool());

    let stores = if current.ctx.role.is_admin() {
        repo.list_all().await?
    } else {
        match current.ctx.store_id {
            Some(store_id) => repo.get(store_id).await?.into_iter().collect(),
            None => Vec::new(),
        }
    };

    Ok(Json(StoreListResponse { stores }))
}

/// Get a store with its member list.
///
/// GET /api/stores/{storeId}
///
/// # Errors
///
/// Returns `Forbidden` for non-members, `NotFound` for an unknown
/// store.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(store_id): Path<StoreId>,
) -> Result<Json<StoreDetailResponse>> {
    current.ctx.require_store(store_id)?;

    let repo = StoreRepository::new(state.pool());
    let store = repo
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("store not found".to_string()))?;
    let users = repo.members(store_id).await?;

    Ok(Json(StoreDetailResponse { store, users }))
}

/// Partially update a store; omitted fields keep their current values.
///
/// PUT /api/stores/{storeId}
///
/// # Errors
///
/// Returns `Forbidden` for non-members, `NotFound` for an unknown
/// store.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(store_id): Path<StoreId>,
    Json(req): Json<UpdateStoreRequest>,
) -> Result<Json<StoreResponse>> {
    current.ctx.require_store(store_id)?;

    let store = StoreRepository::new(state.pool())
        .update_partial(
            store_id,
            req.name.as_deref(),
            req.description.as_deref(),
            req.status.as_deref(),
        )
        .await?;

    Ok(Json(StoreResponse {
        message: "Store updated successfully".to_string(),
        store,
    }))
}

/// Add a user (by email) to a store.
///
/// POST /api/stores/{storeId}/users
///
/// # Errors
///
/// Returns `Forbidden` for non-admins, `NotFound` for an unknown store
/// or user, `Conflict` if the user already has a store.
pub async fn add_member(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(store_id): Path<StoreId>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Json<AddMemberResponse>> {
    current.ctx.require_admin()?;

    let email = Email::parse(&req.email).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let repo = StoreRepository::new(state.pool());
    repo.get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("store not found".to_string()))?;

    let user = UserRepository::new(state.pool())
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    repo.add_member(store_id, user.id).await?;

    tracing::info!(store_id = %store_id, user_id = %user.id, "user added to store");

    Ok(Json(AddMemberResponse {
        message: "User added to store successfully".to_string(),
        user: joined_member(&user, store_id),
    }))
}

/// Response shape for a freshly added member.
///
/// The row was fetched before the affiliation was written; the store id
/// it now holds is the one just assigned.
fn joined_member(user: &UserRow, store_id: StoreId) -> PublicUser {
    let mut member = PublicUser::from(user);
    member.store_id = Some(store_id);
    member
}

/// Remove a user from a store.
///
/// DELETE /api/stores/{storeId}/users/{userId}
///
/// # Errors
///
/// Returns `Forbidden` for non-admins, `NotFound` if the user isn't a
/// member of this store.
pub async fn remove_member(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path((store_id, user_id)): Path<(StoreId, UserId)>,
) -> Result<Json<MessageResponse>> {
    current.ctx.require_admin()?;

    StoreRepository::new(state.pool())
        .remove_member(store_id, user_id)
        .await
        .map_err(|err| match err {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("user is not associated with this store".to_string())
            }
            other => AppError::from(other),
        })?;

    tracing::info!(store_id = %store_id, user_id = %user_id, "user removed from store");

    Ok(Json(MessageResponse {
        message: "User removed from store successfully".to_string(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use harborfront_core::UserRole;

    #[test]
    fn added_member_response_carries_the_new_store() {
        let row = UserRow {
            id: UserId::new(4),
            email: Email::parse("member@example.com").unwrap(),
            password_hash: "hash".to_string(),
            first_name: None,
            last_name: None,
            role: UserRole::User,
            store_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let member = joined_member(&row, StoreId::new(9));
        assert_eq!(member.store_id, Some(StoreId::new(9)));

        let json = serde_json::to_string(&member).unwrap();
        assert!(json.contains("\"storeId\":9"));
    }
}
