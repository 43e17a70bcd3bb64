//! User repository (Identity Store).

use sqlx::PgPool;

use harborfront_core::{Email, StoreId, UserId, UserRole};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::{ProfileStore, UserProfile, UserRow};

/// Repository for user rows.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, role, store_id, \
     created_at, updated_at";

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<UserRow>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<UserRow>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        store_id: Option<StoreId>,
    ) -> Result<UserRow, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, store_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(store_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email already exists"))?;

        Ok(row)
    }

    /// Replace a user's credential hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
                .bind(password_hash)
                .bind(id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Get a user's profile with their store joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn get_profile(&self, id: UserId) -> Result<UserProfile, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct ProfileRow {
            id: UserId,
            email: Email,
            first_name: Option<String>,
            last_name: Option<String>,
            role: UserRole,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
            store_id: Option<StoreId>,
            store_name: Option<String>,
            store_description: Option<String>,
            store_status: Option<String>,
        }

        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT u.id, u.email, u.first_name, u.last_name, u.role, u.created_at, \
                    u.updated_at, u.store_id, \
                    s.name AS store_name, s.description AS store_description, \
                    s.status AS store_status \
             FROM users u \
             LEFT JOIN stores s ON u.store_id = s.id \
             WHERE u.id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let store = match (row.store_id, row.store_name, row.store_status) {
            (Some(id), Some(name), Some(status)) => Some(ProfileStore {
                id,
                name,
                description: row.store_description,
                status,
            }),
            _ => None,
        };

        Ok(UserProfile {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
            store,
        })
    }
}
