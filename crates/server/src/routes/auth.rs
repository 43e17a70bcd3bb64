//! Authentication routes.
//!
//! Registration and login hand back the user plus a fresh access/refresh
//! pair. Refresh rotation is single-use: the presented token is deleted
//! in the same transaction that stores its replacement, so a replayed
//! token fails cleanly.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use harborfront_core::{Email, StoreId};

use crate::db::{
    PasswordResetTokenRepository, RefreshTokenRepository, StoreRepository, UserRepository,
};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::user::{PublicUser, UserProfile, UserRow};
use crate::services::auth::{
    self, AuthError, REFRESH_TOKEN_TTL, RESET_TOKEN_TTL, generate_opaque_token,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub store_id: Option<StoreId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Mint an access token and store a fresh refresh token for a user.
async fn issue_token_pair(state: &AppState, user: &UserRow) -> Result<(String, String)> {
    let access_token = state.tokens().mint(user)?;
    let refresh_token = generate_opaque_token();

    RefreshTokenRepository::new(state.pool())
        .insert(user.id, &refresh_token, Utc::now() + REFRESH_TOKEN_TTL)
        .await?;

    Ok((access_token, refresh_token))
}

/// Register a new user.
///
/// POST /api/auth/register
///
/// # Errors
///
/// Returns `InvalidInput` for a bad email or empty password, `NotFound`
/// for an unknown `storeId`, `Conflict` for a duplicate email.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let email = Email::parse(&req.email).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    if req.password.is_empty() {
        return Err(AppError::InvalidInput("password is required".to_string()));
    }

    if let Some(store_id) = req.store_id {
        StoreRepository::new(state.pool())
            .get(store_id)
            .await?
            .ok_or_else(|| AppError::NotFound("store not found".to_string()))?;
    }

    let password_hash = auth::hash_password(req.password).await?;

    let user = UserRepository::new(state.pool())
        .create(
            &email,
            &password_hash,
            req.first_name.as_deref(),
            req.last_name.as_deref(),
            req.store_id,
        )
        .await?;

    let (access_token, refresh_token) = issue_token_pair(&state, &user).await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: PublicUser::from(&user),
            access_token,
            refresh_token,
        }),
    ))
}

/// Log in with email and password.
///
/// POST /api/auth/login
///
/// # Errors
///
/// Returns `Unauthorized` for an unknown email or wrong password; the
/// two cases are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email = Email::parse(&req.email).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let user = UserRepository::new(state.pool())
        .get_by_email(&email)
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    let valid = auth::verify_password(req.password, user.password_hash.clone()).await?;
    if !valid {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    let (access_token, refresh_token) = issue_token_pair(&state, &user).await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: PublicUser::from(&user),
        access_token,
        refresh_token,
    }))
}

/// Exchange a refresh token for a new access/refresh pair.
///
/// POST /api/auth/refresh-token
///
/// The old token is consumed atomically with storing the new one. When
/// two requests race on the same token, exactly one wins; the loser
/// fails with `Unauthorized` and no new pair is issued.
///
/// # Errors
///
/// Returns `Unauthorized` for unknown, expired, or already-consumed
/// tokens.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>> {
    if req.refresh_token.is_empty() {
        return Err(AppError::InvalidInput(
            "refresh token is required".to_string(),
        ));
    }

    let tokens = RefreshTokenRepository::new(state.pool());

    let row = tokens
        .find(&req.refresh_token)
        .await?
        .ok_or(AppError::Auth(AuthError::TokenInvalid))?;

    if row.expires_at <= Utc::now() {
        return Err(AppError::Auth(AuthError::TokenExpired));
    }

    let user = UserRepository::new(state.pool())
        .get_by_id(row.user_id)
        .await?
        .ok_or(AppError::Auth(AuthError::TokenInvalid))?;

    let access_token = state.tokens().mint(&user)?;
    let new_refresh = generate_opaque_token();

    tokens
        .rotate(
            &req.refresh_token,
            &new_refresh,
            user.id,
            Utc::now() + REFRESH_TOKEN_TTL,
        )
        .await
        .map_err(|err| match err {
            // Lost a race: another request consumed the token first.
            crate::db::RepositoryError::NotFound => AppError::Auth(AuthError::TokenInvalid),
            other => AppError::from(other),
        })?;

    Ok(Json(TokenPairResponse {
        access_token,
        refresh_token: new_refresh,
    }))
}

/// Revoke a refresh token.
///
/// POST /api/auth/logout
///
/// Idempotent: revoking an unknown token succeeds.
///
/// # Errors
///
/// Returns `InvalidInput` if no token is supplied.
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<MessageResponse>> {
    if req.refresh_token.is_empty() {
        return Err(AppError::InvalidInput(
            "refresh token is required".to_string(),
        ));
    }

    RefreshTokenRepository::new(state.pool())
        .delete(&req.refresh_token)
        .await?;

    Ok(Json(MessageResponse {
        message: "Logout successful".to_string(),
    }))
}

const FORGOT_PASSWORD_MESSAGE: &str =
    "If your email exists in our system, you will receive a password reset link";

/// Create a password reset token.
///
/// POST /api/auth/forgot-password
///
/// Always answers with the same message whether or not the account
/// exists, so the endpoint can't be used for account enumeration.
///
/// # Errors
///
/// Returns `Database` only on storage failure.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>> {
    let Ok(email) = Email::parse(&req.email) else {
        return Ok(Json(ForgotPasswordResponse {
            message: FORGOT_PASSWORD_MESSAGE.to_string(),
            reset_token: None,
        }));
    };

    let Some(user) = UserRepository::new(state.pool()).get_by_email(&email).await? else {
        return Ok(Json(ForgotPasswordResponse {
            message: FORGOT_PASSWORD_MESSAGE.to_string(),
            reset_token: None,
        }));
    };

    let token = generate_opaque_token();
    PasswordResetTokenRepository::new(state.pool())
        .insert(user.id, &token, Utc::now() + RESET_TOKEN_TTL)
        .await?;

    // No mail delivery is wired up; the token rides back in the
    // response the way the reset flow consumes it.
    Ok(Json(ForgotPasswordResponse {
        message: FORGOT_PASSWORD_MESSAGE.to_string(),
        reset_token: Some(token),
    }))
}

/// Change the caller's password.
///
/// POST /api/auth/reset-password
///
/// # Errors
///
/// Returns `Unauthorized` when the current password doesn't verify.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(AppError::InvalidInput(
            "current password and new password are required".to_string(),
        ));
    }

    let valid =
        auth::verify_password(req.current_password, current.user.password_hash.clone()).await?;
    if !valid {
        return Err(AppError::Unauthorized(
            "current password is incorrect".to_string(),
        ));
    }

    let password_hash = auth::hash_password(req.new_password).await?;
    UserRepository::new(state.pool())
        .update_password(current.user.id, &password_hash)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password reset successful".to_string(),
    }))
}

/// Get the caller's profile with their store embedded.
///
/// GET /api/auth/profile
///
/// # Errors
///
/// Returns `NotFound` if the account vanished mid-session.
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<UserProfile>> {
    let profile = UserRepository::new(state.pool())
        .get_profile(current.user.id)
        .await?;

    Ok(Json(profile))
}
