//! Token pair and authentication state types.

use serde::{Deserialize, Serialize};

/// Store entry holding the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Store entry holding the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Profile entries written at login and removed at logout.
pub const PROFILE_COOKIES: [&str; 3] = ["name", "nickname", "email"];

/// Message reported for any authenticated state.
pub const MSG_AUTHENTICATED: &str = "Success validation!";

/// Message reported when no usable token is stored.
pub const MSG_TOKEN_MISSING: &str = "The token does not exist.";

/// Message reported when the refresh exchange fails.
pub const MSG_REFRESH_REJECTED: &str = "Refresh token expired or invalid.";

/// An access/refresh bearer token pair.
///
/// Both values are opaque; nothing is assumed about their structure.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Whether both tokens are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

// Tokens are bearer secrets; keep them out of logs and panic messages.
impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Why a resolution ended unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    /// Neither a valid access token nor any refresh token was stored.
    MissingToken,
    /// The refresh exchange was rejected or could not be completed.
    RefreshRejected,
}

/// Terminal state of the validate → refresh → fail cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The stored access token passed validation.
    Validated,
    /// A new pair was obtained with the refresh token and written to the store.
    Refreshed,
    /// No session could be established.
    Unauthenticated(UnauthenticatedReason),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Validated | AuthOutcome::Refreshed)
    }
}

/// Result of resolving the caller's authentication status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub message: String,
}

impl AuthState {
    pub fn authenticated() -> Self {
        Self {
            is_authenticated: true,
            message: MSG_AUTHENTICATED.to_string(),
        }
    }

    pub fn unauthenticated(reason: UnauthenticatedReason) -> Self {
        let message = match reason {
            UnauthenticatedReason::MissingToken => MSG_TOKEN_MISSING,
            UnauthenticatedReason::RefreshRejected => MSG_REFRESH_REJECTED,
        };
        Self {
            is_authenticated: false,
            message: message.to_string(),
        }
    }
}

impl From<AuthOutcome> for AuthState {
    fn from(outcome: AuthOutcome) -> Self {
        match outcome {
            AuthOutcome::Validated | AuthOutcome::Refreshed => AuthState::authenticated(),
            AuthOutcome::Unauthenticated(reason) => AuthState::unauthenticated(reason),
        }
    }
}

/// Role attached to a user account by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Bot,
}

/// Profile details returned alongside the tokens at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub nickname: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}
