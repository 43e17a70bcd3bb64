//! User row and response types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use harborfront_core::{Email, StoreId, UserId, UserRole};

/// A user row as stored.
///
/// Carries the credential hash; never serialize this type directly.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub store_id: Option<StoreId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User shape returned by the API (no credential hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub store_id: Option<StoreId>,
}

impl From<&UserRow> for PublicUser {
    fn from(row: &UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email.clone(),
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            role: row.role,
            store_id: row.store_id,
        }
    }
}

/// Profile response with the user's store embedded (or null).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub store: Option<ProfileStore>,
}

/// Store summary embedded in a profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStore {
    pub id: StoreId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_carries_the_hash() {
        let row = UserRow {
            id: UserId::new(1),
            email: Email::parse("a@x.com").expect("valid"),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            role: UserRole::User,
            store_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&PublicUser::from(&row)).expect("serialize");
        assert!(!json.contains("$2b$"));
        assert!(json.contains("\"email\":\"a@x.com\""));
        assert!(json.contains("\"storeId\":null"));
    }
}
