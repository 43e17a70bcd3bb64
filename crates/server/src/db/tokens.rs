//! Credential token repositories.
//!
//! Both token families are opaque random strings with server-side
//! expiry. Expired rows are reaped opportunistically whenever a new
//! token is written for the same user, so neither table needs a
//! background sweeper.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use harborfront_core::{RefreshTokenId, UserId};

use super::RepositoryError;

/// A stored refresh token row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshTokenRow {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Repository for refresh tokens.
pub struct RefreshTokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RefreshTokenRepository<'a> {
    /// Create a new refresh token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new refresh token, reaping the user's expired rows in
    /// the same call.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement fails.
    pub async fn insert(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1 AND expires_at < now()")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        sqlx::query("INSERT INTO refresh_tokens (user_id, token, expires_at) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Look up a refresh token by its opaque value.
    ///
    /// Expiry is not checked here; callers compare `expires_at` so they
    /// can report expired and unknown tokens differently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find(&self, token: &str) -> Result<Option<RefreshTokenRow>, RepositoryError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "SELECT user_id, expires_at FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Atomically replace one refresh token with another.
    ///
    /// The delete of the old row is the serialization point: when two
    /// rotations race on the same token, exactly one observes the row
    /// and wins; the loser gets `NotFound` and no new token is written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the old token was already
    /// consumed.
    pub async fn rotate(
        &self,
        old_token: &str,
        new_token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let deleted: Option<(RefreshTokenId,)> =
            sqlx::query_as("DELETE FROM refresh_tokens WHERE token = $1 RETURNING id")
                .bind(old_token)
                .fetch_optional(&mut *tx)
                .await?;

        if deleted.is_none() {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("INSERT INTO refresh_tokens (user_id, token, expires_at) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(new_token)
            .bind(expires_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete a refresh token (logout). Deleting an unknown token is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete(&self, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

/// Repository for password reset tokens.
pub struct PasswordResetTokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PasswordResetTokenRepository<'a> {
    /// Create a new password reset token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a reset token, reaping the user's expired rows in the same
    /// call.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement fails.
    pub async fn insert(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "DELETE FROM password_reset_tokens WHERE user_id = $1 AND expires_at < now()",
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;

        sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
