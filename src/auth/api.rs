//! Client for the REST API's identity endpoints.
//!
//! Wraps an [`HttpClient`] and speaks the three endpoints the session core
//! depends on:
//!
//! - `GET /auth/validate-token` - is this access token still good?
//! - `POST /auth/refresh` - exchange a refresh token for a new pair
//! - `POST /auth/login` - exchange email/password for a pair and a profile

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::credentials::{CredentialPair, UserProfile, UserRole};
use crate::traits::{Headers, HttpClient, HttpError, Response};

/// Error type for identity API operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthApiError {
    /// The HTTP exchange itself failed
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned a non-2xx status
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The body decoded but is unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AuthApiError {
    /// HTTP status if the server answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Response body of `GET /auth/validate-token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    #[serde(default)]
    pub valid: bool,
}

/// Request body of `POST /auth/refresh`.
#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Request body of `POST /auth/login`.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response body of `POST /auth/login`.
///
/// The API has shipped two shapes: profile fields nested under `user`, and
/// profile fields inlined next to the tokens. Both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl LoginResponse {
    /// The issued token pair.
    pub fn tokens(&self) -> CredentialPair {
        CredentialPair::new(self.access_token.clone(), self.refresh_token.clone())
    }

    /// The user's profile, from whichever shape the server sent.
    pub fn profile(&self) -> Option<UserProfile> {
        if let Some(user) = &self.user {
            return Some(user.clone());
        }
        match (&self.name, &self.nickname, &self.email) {
            (Some(name), Some(nickname), Some(email)) => Some(UserProfile {
                name: name.clone(),
                nickname: nickname.clone(),
                email: email.clone(),
                role: self.role,
            }),
            _ => None,
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// Looks for `error`, then `message`; falls back to the raw body.
pub fn error_message(response: &Response) -> String {
    if let Ok(value) = response.json::<serde_json::Value>() {
        for key in ["error", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    response
        .text()
        .unwrap_or_else(|_| "Unknown error".to_string())
}

/// Client for the identity endpoints.
pub struct AuthApiClient<C: HttpClient> {
    /// Base URL of the REST API
    base_url: String,
    /// Shared HTTP transport
    client: Arc<C>,
}

impl<C: HttpClient> Clone for AuthApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: HttpClient> AuthApiClient<C> {
    /// Create a client for the API at `base_url`.
    pub fn new(base_url: impl Into<String>, client: Arc<C>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying transport, shared with authenticated downstream calls.
    pub fn http(&self) -> &Arc<C> {
        &self.client
    }

    fn json_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    /// Ask the API whether an access token is still valid.
    ///
    /// GET /auth/validate-token
    ///
    /// Returns `Ok(false)` for a 2xx answer that does not say `"valid": true`.
    pub async fn validate_token(&self, access_token: &str) -> Result<bool, AuthApiError> {
        let url = format!("{}/auth/validate-token", self.base_url);
        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), bearer(access_token));

        let response = self.client.get(&url, &headers).await?;
        if !response.is_success() {
            return Err(AuthApiError::Status {
                status: response.status,
                message: error_message(&response),
            });
        }

        let body: ValidateResponse = response.json()?;
        Ok(body.valid)
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// POST /auth/refresh
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<CredentialPair, AuthApiError> {
        let url = format!("{}/auth/refresh", self.base_url);
        let body = serde_json::to_string(&RefreshRequest { refresh_token })?;

        let response = self.client.post(&url, &body, &Self::json_headers()).await?;
        if !response.is_success() {
            return Err(AuthApiError::Status {
                status: response.status,
                message: error_message(&response),
            });
        }

        let pair: CredentialPair = response.json()?;
        if !pair.is_complete() {
            return Err(AuthApiError::InvalidResponse(
                "refresh response carries an empty token".to_string(),
            ));
        }
        Ok(pair)
    }

    /// Exchange email and password for a token pair and profile.
    ///
    /// POST /auth/login
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthApiError> {
        let url = format!("{}/auth/login", self.base_url);
        let body = serde_json::to_string(&LoginRequest { email, password })?;

        let response = self.client.post(&url, &body, &Self::json_headers()).await?;
        if !response.is_success() {
            return Err(AuthApiError::Status {
                status: response.status,
                message: error_message(&response),
            });
        }

        let login: LoginResponse = response.json()?;
        if !login.tokens().is_complete() {
            return Err(AuthApiError::InvalidResponse(
                "login response carries an empty token".to_string(),
            ));
        }
        Ok(login)
    }
}

/// `Authorization` header value for a bearer token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
