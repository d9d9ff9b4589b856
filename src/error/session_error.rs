//! Unified error type.

use super::auth::AuthError;
use super::category::ErrorCategory;
use crate::auth::AuthApiError;
use crate::traits::{HttpError, StoreError};

/// Any error a session operation or CLI command can end with.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Http(#[from] HttpError),

    #[error("Cookie store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid arguments: {message}")]
    Usage { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    pub fn config(message: impl Into<String>) -> Self {
        SessionError::Config {
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        SessionError::Usage {
            message: message.into(),
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        if self.requires_reauth() {
            return ErrorCategory::Auth;
        }
        match self {
            SessionError::Auth(err) => match err {
                AuthError::Network { .. } => ErrorCategory::Network,
                AuthError::InvalidResponse { .. } => ErrorCategory::Server,
                AuthError::ApiError { status, .. } if *status >= 500 => ErrorCategory::Server,
                AuthError::CredentialsSaveFailed { .. } => ErrorCategory::System,
                AuthError::LoginRejected { .. } => ErrorCategory::User,
                AuthError::NotAuthenticated | AuthError::ApiError { .. } => ErrorCategory::Auth,
            },
            SessionError::Http(HttpError::InvalidUrl(_)) => ErrorCategory::Configuration,
            SessionError::Http(_) => ErrorCategory::Network,
            SessionError::Store(_) | SessionError::Io(_) => ErrorCategory::System,
            SessionError::Config { .. } => ErrorCategory::Configuration,
            SessionError::Usage { .. } => ErrorCategory::User,
        }
    }

    /// Check if signing in again would help.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, SessionError::Auth(err) if err.requires_reauth())
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Auth(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            SessionError::Auth(err) => err.error_code(),
            SessionError::Http(_) => "E_HTTP",
            SessionError::Store(_) => "E_STORE",
            SessionError::Config { .. } => "E_CONFIG",
            SessionError::Usage { .. } => "E_USAGE",
            SessionError::Io(_) => "E_IO",
        }
    }
}

impl From<AuthApiError> for SessionError {
    fn from(err: AuthApiError) -> Self {
        SessionError::Auth(err.into())
    }
}
