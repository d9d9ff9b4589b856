//! Credential store trait abstraction.
//!
//! The store is a cookie-like key-value jar owned by the request/response
//! cycle. The session core reads and rewrites entries through this trait but
//! never owns the store's lifecycle.

use async_trait::async_trait;

/// Credential store operation errors.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// Failed to read an entry
    ReadFailed(String),
    /// Failed to write an entry
    WriteFailed(String),
    /// Failed to delete an entry
    DeleteFailed(String),
    /// IO error
    Io(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::ReadFailed(msg) => write!(f, "Failed to read cookie: {}", msg),
            StoreError::WriteFailed(msg) => write!(f, "Failed to write cookie: {}", msg),
            StoreError::DeleteFailed(msg) => write!(f, "Failed to delete cookie: {}", msg),
            StoreError::Io(msg) => write!(f, "IO error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StoreError::Other(msg) => write!(f, "Cookie store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes applied when a cookie is written.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CookieOptions {
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    /// Lifetime in seconds. `None` makes a session cookie.
    pub max_age: Option<i64>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            http_only: true,
            secure: true,
            same_site: SameSite::Lax,
            max_age: None,
        }
    }
}

impl CookieOptions {
    /// Set the cookie lifetime in seconds.
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Set whether the cookie is restricted to HTTPS.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the cookie path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Render a `Set-Cookie` header value for `name=value` with these attributes.
    pub fn to_set_cookie(&self, name: &str, value: &str) -> String {
        let mut header = format!("{}={}; Path={}", name, value, self.path);
        if let Some(max_age) = self.max_age {
            header.push_str(&format!("; Max-Age={}", max_age));
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        header.push_str("; SameSite=");
        header.push_str(self.same_site.as_str());
        header
    }
}

/// Trait for the cookie-like credential store.
///
/// Implementations include the request-scoped [`MemoryCookieStore`], the
/// persistent [`FileCookieStore`] used by the CLI, and a mock store for tests.
///
/// [`MemoryCookieStore`]: crate::adapters::MemoryCookieStore
/// [`FileCookieStore`]: crate::adapters::FileCookieStore
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read an entry.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if the entry exists
    /// - `Ok(None)` if it does not
    /// - `Err(error)` if reading failed
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Write an entry, overwriting any previous value.
    async fn set(&self, name: &str, value: &str, options: &CookieOptions)
        -> Result<(), StoreError>;

    /// Remove an entry. Removing a missing entry is not an error.
    ///
    /// `options` are the attributes the entry was written with; a browser
    /// only drops a cookie whose expiry matches its `Path` and `Secure`.
    async fn delete(&self, name: &str, options: &CookieOptions) -> Result<(), StoreError>;
}
