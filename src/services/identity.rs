// SPDX-License-Identifier: MIT

//! Firebase Identity Toolkit REST client.
//!
//! Handles:
//! - Email/password sign-up and sign-in
//! - Password reset emails
//! - Password updates (after credential re-check)
//!
//! The session the API hands out afterwards is our own JWT; Firebase ID
//! tokens are only used transiently within this module.

use crate::error::AppError;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Identity Toolkit API client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// A verified account, as returned by sign-up and sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityAccount {
    /// Firebase uid; doubles as the `users` document ID
    #[serde(rename = "localId")]
    pub uid: String,
    pub email: String,
    /// Firebase ID token, needed for follow-up account operations
    #[serde(rename = "idToken")]
    pub id_token: String,
}

/// Error body shape returned by Identity Toolkit.
#[derive(Debug, Deserialize)]
struct IdentityErrorBody {
    error: IdentityErrorDetail,
}

#[derive(Debug, Deserialize)]
struct IdentityErrorDetail {
    message: String,
}

impl IdentityClient {
    /// Create a new client with the project's Web API key.
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Client pointed at a stub server (tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Create a new email/password account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityAccount, AppError> {
        self.post_json(
            "accounts:signUp",
            &serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// Verify an email/password pair.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityAccount, AppError> {
        self.post_json(
            "accounts:signInWithPassword",
            &serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// Send a password-reset email.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post_json(
                "accounts:sendOobCode",
                &serde_json::json!({
                    "requestType": "PASSWORD_RESET",
                    "email": email,
                }),
            )
            .await?;
        Ok(())
    }

    /// Set a new password for a freshly verified session.
    pub async fn update_password(
        &self,
        id_token: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post_json(
                "accounts:update",
                &serde_json::json!({
                    "idToken": id_token,
                    "password": new_password,
                    "returnSecureToken": false,
                }),
            )
            .await?;
        Ok(())
    }

    /// Generic POST with JSON body and response.
    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::IdentityApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status, mapping Identity Toolkit error codes.
    ///
    /// 400-class responses carry a machine code like EMAIL_NOT_FOUND or
    /// INVALID_LOGIN_CREDENTIALS; those surface as credential failures.
    /// Anything else is treated as a provider outage.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| AppError::IdentityApi(format!("Invalid response body: {}", e)));
        }

        let code = response
            .json::<IdentityErrorBody>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_else(|_| "UNKNOWN".to_string());

        if status.is_client_error() {
            tracing::debug!(code = %code, "Identity Toolkit rejected credentials");
            return Err(AppError::InvalidCredentials(code));
        }

        Err(AppError::IdentityApi(format!(
            "Identity Toolkit returned {}: {}",
            status, code
        )))
    }
}
