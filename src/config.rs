//! Session configuration.
//!
//! This module defines the settings shared by every cycle: where the REST API
//! lives, how long outbound calls may take, and which attributes the token
//! cookies are written with.

use std::path::PathBuf;
use std::time::Duration;

use crate::traits::CookieOptions;

/// Default base URL of the REST API.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default timeout for outbound identity calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default lifetime of the access token cookie (1 hour).
pub const DEFAULT_ACCESS_TOKEN_MAX_AGE: i64 = 60 * 60;

/// Default lifetime of the refresh token and profile cookies (7 days).
pub const DEFAULT_REFRESH_TOKEN_MAX_AGE: i64 = 60 * 60 * 24 * 7;

/// The cookie jar directory name used by the CLI.
const COOKIE_DIR: &str = ".authstate";

/// The cookie jar file name used by the CLI.
const COOKIE_FILE: &str = "cookies.json";

/// Configuration for session resolution.
///
/// Use the builder pattern to customize behavior.
///
/// # Example
///
/// ```ignore
/// use authstate::config::AuthConfig;
///
/// let config = AuthConfig::default()
///     .with_api_url("https://api.example.com")
///     .with_secure_cookies(false);
/// ```
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the REST API (no trailing slash)
    pub api_url: String,
    /// Timeout applied to outbound calls by the reqwest client
    pub request_timeout: Duration,
    /// Lifetime of the access token cookie in seconds
    pub access_token_max_age: i64,
    /// Lifetime of the refresh token and profile cookies in seconds
    pub refresh_token_max_age: i64,
    /// Whether cookies carry the `Secure` attribute
    pub secure_cookies: bool,
    /// Location of the CLI's cookie jar (None if no home directory)
    pub cookie_path: Option<PathBuf>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            access_token_max_age: DEFAULT_ACCESS_TOKEN_MAX_AGE,
            refresh_token_max_age: DEFAULT_REFRESH_TOKEN_MAX_AGE,
            secure_cookies: true,
            cookie_path: default_cookie_path(),
        }
    }
}

impl AuthConfig {
    /// Create a new AuthConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the REST API base URL. A trailing slash is stripped.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the outbound request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the access token cookie lifetime.
    pub fn with_access_token_max_age(mut self, seconds: i64) -> Self {
        self.access_token_max_age = seconds;
        self
    }

    /// Set the refresh token cookie lifetime.
    pub fn with_refresh_token_max_age(mut self, seconds: i64) -> Self {
        self.refresh_token_max_age = seconds;
        self
    }

    /// Set whether cookies are marked `Secure`.
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Set the CLI cookie jar location.
    pub fn with_cookie_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_path = Some(path.into());
        self
    }

    /// Cookie attributes for the access token.
    pub fn access_cookie_options(&self) -> CookieOptions {
        CookieOptions::default()
            .with_secure(self.secure_cookies)
            .with_max_age(self.access_token_max_age)
    }

    /// Cookie attributes for the refresh token and profile entries.
    pub fn refresh_cookie_options(&self) -> CookieOptions {
        CookieOptions::default()
            .with_secure(self.secure_cookies)
            .with_max_age(self.refresh_token_max_age)
    }

    /// Create config from environment variables.
    ///
    /// - `AUTHSTATE_API_URL`: REST API base URL
    /// - `AUTHSTATE_TIMEOUT_SECS`: outbound timeout in seconds
    /// - `AUTHSTATE_INSECURE_COOKIES`: when set, drops the `Secure` attribute
    /// - `AUTHSTATE_COOKIE_PATH`: CLI cookie jar location
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("AUTHSTATE_API_URL") {
            if !url.trim().is_empty() {
                config = config.with_api_url(url.trim());
            }
        }

        if let Ok(secs) = std::env::var("AUTHSTATE_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    config = config.with_request_timeout(Duration::from_secs(secs));
                }
                _ => tracing::warn!("Ignoring invalid AUTHSTATE_TIMEOUT_SECS value: {}", secs),
            }
        }

        if std::env::var("AUTHSTATE_INSECURE_COOKIES").is_ok() {
            config = config.with_secure_cookies(false);
        }

        if let Ok(path) = std::env::var("AUTHSTATE_COOKIE_PATH") {
            if !path.trim().is_empty() {
                config = config.with_cookie_path(path.trim());
            }
        }

        config
    }
}

/// `~/.authstate/cookies.json`, or None if the home directory is unknown.
fn default_cookie_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(COOKIE_DIR).join(COOKIE_FILE))
}
