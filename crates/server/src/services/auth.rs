//! Credential primitives: signed access tokens, opaque refresh/reset
//! tokens, and password hashing.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use harborfront_core::{UserId, UserRole};

use crate::models::user::UserRow;

/// Refresh tokens live for seven days.
pub const REFRESH_TOKEN_TTL: Duration = Duration::days(7);

/// Password reset tokens live for one hour.
pub const RESET_TOKEN_TTL: Duration = Duration::hours(1);

/// Errors from authentication plumbing.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair didn't match a stored credential.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Access token past its expiry.
    #[error("token expired")]
    TokenExpired,

    /// Access token malformed or signature mismatch.
    #[error("invalid token")]
    TokenInvalid,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried in an access token.
///
/// Identity only: role and store affiliation are re-read from the live
/// user row on every request, so stale claims can't widen access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Mints and validates signed access tokens (HS256).
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from the shared signing secret and access token
    /// TTL in seconds. The TTL is range-validated at config load.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_secs: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Mint an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if encoding fails.
    pub fn mint(&self, user: &UserRow) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` past expiry, `TokenInvalid`
    /// for anything else wrong with the token.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })
    }
}

/// Generate an opaque refresh/reset token.
#[must_use]
pub fn generate_opaque_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Hash a password on the blocking pool.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if hashing fails or the blocking task
/// is cancelled.
pub async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against a stored hash on the blocking pool.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if verification itself fails (a
/// non-matching password is `Ok(false)`, not an error).
pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use harborfront_core::Email;

    fn issuer(ttl_secs: i64) -> TokenIssuer {
        TokenIssuer::new(
            &SecretString::from("a-test-signing-secret-of-plausible-length"),
            ttl_secs,
        )
    }

    fn user() -> UserRow {
        UserRow {
            id: UserId::from(7),
            email: Email::parse("buyer@example.com").unwrap(),
            password_hash: "irrelevant".to_string(),
            first_name: None,
            last_name: None,
            role: UserRole::User,
            store_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn minted_token_round_trips() {
        let issuer = issuer(900);
        let token = issuer.mint(&user()).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, UserId::from(7));
        assert_eq!(claims.email, "buyer@example.com");
        assert_eq!(claims.role, UserRole::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn configured_ttl_drives_expiry() {
        let issuer = issuer(60);
        let token = issuer.mint(&user()).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn garbage_token_is_invalid() {
        let issuer = issuer(900);
        assert!(matches!(
            issuer.verify("not-a-token"),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let token = issuer(900).mint(&user()).unwrap();
        let other = TokenIssuer::new(
            &SecretString::from("a-different-signing-secret-entirely!"),
            900,
        );
        assert!(matches!(other.verify(&token), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn opaque_tokens_are_unique() {
        let a = generate_opaque_token();
        let b = generate_opaque_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hash = hash_password("secret1".to_string()).await.unwrap();
        assert!(verify_password("secret1".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
    }
}
