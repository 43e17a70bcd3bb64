//! Authorization checks over a resolved permission context.
//!
//! The context is derived per request from the live user row, never
//! from token claims alone, so role or store changes take effect on the
//! next request rather than at token expiry.

use harborfront_core::{StoreId, UserId, UserRole};

use crate::error::AppError;
use crate::models::user::UserRow;

/// A caller's resolved identity, role, and store affiliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionContext {
    pub user_id: UserId,
    pub role: UserRole,
    pub store_id: Option<StoreId>,
}

impl PermissionContext {
    /// Fail with `Forbidden` unless the caller is an admin.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("admin access required".to_string()))
        }
    }

    /// Fail with `Forbidden` unless the caller is an admin or is
    /// affiliated with the given store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` when the caller's store doesn't
    /// match (including callers with no store at all).
    pub fn require_store(&self, store_id: StoreId) -> Result<(), AppError> {
        if self.role.is_admin() || self.store_id == Some(store_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "not a member of this store".to_string(),
            ))
        }
    }

}

impl From<&UserRow> for PermissionContext {
    fn from(row: &UserRow) -> Self {
        Self {
            user_id: row.id,
            role: row.role,
            store_id: row.store_id,
        }
    }
}
