//! Authentication-related error types.
//!
//! These are the errors the fallible session operations (login, and the CLI
//! built on the cycle) surface to callers. Resolution itself never fails; it
//! folds every problem into an unauthenticated state.

use std::fmt;

use crate::auth::AuthApiError;
use crate::traits::StoreError;

/// Default message for a rejected login when the server gives none.
pub const DEFAULT_LOGIN_REJECTED: &str = "Invalid credentials";

/// Authentication-specific error variants.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No session could be established.
    NotAuthenticated,

    /// The server refused the email/password pair.
    LoginRejected { message: String },

    /// The identity API answered with an unexpected status.
    ApiError { status: u16, message: String },

    /// The identity API answered 2xx with a body we could not use.
    InvalidResponse { message: String },

    /// The identity API could not be reached.
    Network { message: String },

    /// Credentials could not be written to the store.
    CredentialsSaveFailed { message: String },
}

impl AuthError {
    /// Build the error for a failed `POST /auth/login`.
    ///
    /// A 401 is a rejection carrying the server's message.
    pub fn from_login_failure(err: AuthApiError) -> Self {
        match err {
            AuthApiError::Status { status: 401, message } => {
                let message = if message.trim().is_empty() || message.trim() == "{}" {
                    DEFAULT_LOGIN_REJECTED.to_string()
                } else {
                    message
                };
                AuthError::LoginRejected { message }
            }
            other => other.into(),
        }
    }

    /// Check if this error might be resolved by re-authenticating.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated | AuthError::ApiError { status: 401, .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NotAuthenticated => {
                "You are not signed in. Please sign in to continue.".to_string()
            }
            AuthError::LoginRejected { message } => message.clone(),
            AuthError::ApiError { status, message } => match *status {
                401 => "Your session has expired. Please sign in again.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                _ => format!("Authentication error: {}", message),
            },
            AuthError::InvalidResponse { .. } => {
                "The server sent an unexpected response. Please try again later.".to_string()
            }
            AuthError::Network { .. } => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            AuthError::CredentialsSaveFailed { .. } => {
                "Could not save your session. Please check file permissions.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::LoginRejected { .. } => "E_AUTH_LOGIN",
            AuthError::ApiError { .. } => "E_AUTH_API",
            AuthError::InvalidResponse { .. } => "E_AUTH_RESPONSE",
            AuthError::Network { .. } => "E_AUTH_NETWORK",
            AuthError::CredentialsSaveFailed { .. } => "E_AUTH_CRED_SAVE",
        }
    }
}

impl From<AuthApiError> for AuthError {
    fn from(err: AuthApiError) -> Self {
        match err {
            AuthApiError::Http(e) => AuthError::Network {
                message: e.to_string(),
            },
            AuthApiError::Json(e) => AuthError::InvalidResponse {
                message: e.to_string(),
            },
            AuthApiError::Status { status, message } => AuthError::ApiError { status, message },
            AuthApiError::InvalidResponse(message) => AuthError::InvalidResponse { message },
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::CredentialsSaveFailed {
            message: err.to_string(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::LoginRejected { message } => write!(f, "Login rejected: {}", message),
            AuthError::ApiError { status, message } => {
                write!(f, "Authentication API error ({}): {}", status, message)
            }
            AuthError::InvalidResponse { message } => {
                write!(f, "Invalid authentication response: {}", message)
            }
            AuthError::Network { message } => write!(f, "Network error: {}", message),
            AuthError::CredentialsSaveFailed { message } => {
                write!(f, "Failed to save credentials: {}", message)
            }
        }
    }
}

impl std::error::Error for AuthError {}
