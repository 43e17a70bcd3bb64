//! Store repository.

use sqlx::PgPool;

use harborfront_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::store::{StoreMember, StoreRow};

/// Repository for stores and their membership.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

const STORE_COLUMNS: &str = "id, name, description, status, created_at, updated_at";

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a store and affiliate the owner with it, in one
    /// transaction.
    ///
    /// The owner affiliation is conditional on the user not already
    /// belonging to a store; when that guard trips the whole
    /// transaction rolls back and the store is not created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the owner already has a
    /// store.
    pub async fn create_with_owner(
        &self,
        name: &str,
        description: Option<&str>,
        owner: UserId,
    ) -> Result<StoreRow, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let store = sqlx::query_as::<_, StoreRow>(&format!(
            "INSERT INTO stores (name, description) VALUES ($1, $2) RETURNING {STORE_COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        let result = sqlx::query(
            "UPDATE users SET store_id = $1, updated_at = now() \
             WHERE id = $2 AND store_id IS NULL",
        )
        .bind(store.id)
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::Conflict(
                "user already belongs to a store".into(),
            ));
        }

        tx.commit().await?;
        Ok(store)
    }

    /// List all stores, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<StoreRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get a store by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<StoreRow>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Partially update a store; `None` fields keep their current
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    pub async fn update_partial(
        &self,
        id: StoreId,
        name: Option<&str>,
        description: Option<&str>,
        status: Option<&str>,
    ) -> Result<StoreRow, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "UPDATE stores SET \
                 name = COALESCE($1, name), \
                 description = COALESCE($2, description), \
                 status = COALESCE($3, status), \
                 updated_at = now() \
             WHERE id = $4 \
             RETURNING {STORE_COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .bind(status)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row)
    }

    /// List the users affiliated with a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn members(&self, id: StoreId) -> Result<Vec<StoreMember>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreMember>(
            "SELECT id, email, first_name, last_name, role \
             FROM users WHERE store_id = $1 ORDER BY created_at ASC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Affiliate a user with a store.
    ///
    /// The update is conditional on the user not already having a
    /// store, enforcing single membership at the row level.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already belongs
    /// to a store, or `RepositoryError::NotFound` if the user doesn't
    /// exist.
    pub async fn add_member(&self, id: StoreId, user: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET store_id = $1, updated_at = now() \
             WHERE id = $2 AND store_id IS NULL",
        )
        .bind(id)
        .bind(user)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing user from one already affiliated.
            let exists: Option<(UserId,)> =
                sqlx::query_as("SELECT id FROM users WHERE id = $1")
                    .bind(user)
                    .fetch_optional(self.pool)
                    .await?;

            return Err(match exists {
                Some(_) => {
                    RepositoryError::Conflict("user already belongs to a store".into())
                }
                None => RepositoryError::NotFound,
            });
        }

        Ok(())
    }

    /// Remove a user's affiliation with a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user isn't a member
    /// of this store.
    pub async fn remove_member(&self, id: StoreId, user: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET store_id = NULL, updated_at = now() \
             WHERE id = $1 AND store_id = $2",
        )
        .bind(user)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
