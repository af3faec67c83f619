// SPDX-License-Identifier: MIT

//! Email/password authentication routes.
//!
//! Credential checks are delegated to Firebase Identity Toolkit; on
//! success we mint our own session JWT so the rest of the API never has
//! to talk to the identity provider.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/password-reset", post(password_reset))
        .route("/auth/password", post(update_password))
}

/// Generic success response.
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ─── Sign Up ─────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"))]
    email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    password: String,
    confirm_password: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub uid: String,
    pub email: String,
}

/// Create a new account.
///
/// Deliberately does NOT return a session: the app sends new users back
/// to the login screen after signup.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SignupResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if req.password != req.confirm_password {
        return Err(AppError::BadRequest("passwords do not match".to_string()));
    }

    let account = state.identity.sign_up(&req.email, &req.password).await?;

    tracing::info!(uid = %account.uid, "Account created");

    Ok(Json(SignupResponse {
        uid: account.uid,
        email: account.email,
    }))
}

// ─── Login ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub uid: String,
    pub email: String,
}

/// Verify credentials and mint a session JWT.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let account = state.identity.sign_in(&req.email, &req.password).await?;

    let token = create_jwt(&account.uid, &account.email, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(uid = %account.uid, "User logged in");

    Ok(Json(LoginResponse {
        token,
        uid: account.uid,
        email: account.email,
    }))
}

/// Logout - sessions are client-held, so there is nothing to revoke.
async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "Logged out. Discard the session token client-side.".to_string(),
    })
}

// ─── Password Reset ──────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "must be a valid email address"))]
    email: String,
}

/// Send a password-reset email via the identity provider.
async fn password_reset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state.identity.send_password_reset(&req.email).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Password reset email sent.".to_string(),
    }))
}

// ─── Password Update ─────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(email(message = "must be a valid email address"))]
    email: String,
    current_password: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    new_password: String,
    confirm_password: String,
}

/// Change the account password.
///
/// The provider requires a recent login for this operation, so the current
/// password is re-verified first and the returned ID token is used for the
/// actual update.
async fn update_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if req.new_password != req.confirm_password {
        return Err(AppError::BadRequest("passwords do not match".to_string()));
    }

    let account = state
        .identity
        .sign_in(&req.email, &req.current_password)
        .await?;

    state
        .identity
        .update_password(&account.id_token, &req.new_password)
        .await?;

    tracing::info!(uid = %account.uid, "Password updated");

    Ok(Json(MessageResponse {
        success: true,
        message: "Password updated.".to_string(),
    }))
}
