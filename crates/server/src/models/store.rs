//! Store row and member types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use harborfront_core::{Email, StoreId, UserId, UserRole};

/// A store row. Status is free-form text (no enforced lifecycle).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoreRow {
    pub id: StoreId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user affiliated with a store, as listed on the store detail view.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoreMember {
    pub id: UserId,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
}
