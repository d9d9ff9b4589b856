//! Authentication state resolution.
//!
//! A [`SessionResolver`] is built once per process and shared. At the start
//! of each logical cycle (one request/response or one CLI invocation) call
//! [`SessionResolver::begin`] with that cycle's cookie store; the returned
//! [`AuthCycle`] answers "is this caller authenticated?" and remembers the
//! answer until it is dropped.
//!
//! Resolution runs the validate → refresh → fail cascade:
//!
//! 1. A stored access token that the API validates wins immediately.
//! 2. Otherwise a stored refresh token is exchanged for a new pair, which is
//!    written back to the store.
//! 3. Otherwise the caller is unauthenticated.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::api::{bearer, AuthApiClient};
use super::credentials::{
    AuthOutcome, AuthState, CredentialPair, UnauthenticatedReason, ACCESS_TOKEN_COOKIE,
    REFRESH_TOKEN_COOKIE,
};
use crate::config::AuthConfig;
use crate::traits::{CredentialStore, Headers, HttpClient, Method, Response, StoreError};

/// Options for [`AuthCycle::authenticated_fetch`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Method,
    /// Extra request headers. `Authorization` is always overwritten.
    pub headers: Headers,
    pub body: Option<String>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a request with a JSON body.
    pub fn json(method: Method, value: &serde_json::Value) -> Self {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            method,
            headers,
            body: Some(value.to_string()),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// What a cycle learned from the cascade.
#[derive(Debug, Clone)]
struct Resolution {
    outcome: AuthOutcome,
    /// Access token to present downstream; the new one after a refresh.
    access_token: Option<String>,
}

impl Resolution {
    fn authenticated(outcome: AuthOutcome, access_token: String) -> Self {
        Self {
            outcome,
            access_token: Some(access_token),
        }
    }

    fn unauthenticated(reason: UnauthenticatedReason) -> Self {
        Self {
            outcome: AuthOutcome::Unauthenticated(reason),
            access_token: None,
        }
    }
}

/// Process-wide entry point for session resolution.
///
/// Holds the identity API client and configuration. Cloning is cheap.
pub struct SessionResolver<C: HttpClient> {
    api: AuthApiClient<C>,
    config: AuthConfig,
}

impl<C: HttpClient> Clone for SessionResolver<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: HttpClient> SessionResolver<C> {
    /// Create a resolver talking to `config.api_url` through `client`.
    pub fn new(config: AuthConfig, client: Arc<C>) -> Self {
        let api = AuthApiClient::new(config.api_url.clone(), client);
        Self { api, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn api(&self) -> &AuthApiClient<C> {
        &self.api
    }

    /// Start a cycle over `store`. The cycle starts with an empty cache.
    pub fn begin<S: CredentialStore>(&self, store: S) -> AuthCycle<C, S> {
        AuthCycle {
            resolver: self.clone(),
            store,
            cache: Mutex::new(None),
        }
    }
}

/// One logical request/response cycle.
///
/// The first call to [`resolve`](Self::resolve) runs the cascade; every later
/// call in the same cycle returns the cached result. Concurrent calls wait
/// for the first one and share its result.
pub struct AuthCycle<C: HttpClient, S: CredentialStore> {
    pub(super) resolver: SessionResolver<C>,
    pub(super) store: S,
    cache: Mutex<Option<Resolution>>,
}

impl<C: HttpClient, S: CredentialStore> AuthCycle<C, S> {
    /// The cycle's credential store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// End the cycle and hand back the store, e.g. to emit its changes.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Resolve the caller's authentication state.
    ///
    /// Never fails: every error along the way ends in an unauthenticated
    /// state.
    pub async fn resolve(&self) -> AuthState {
        self.resolution().await.outcome.into()
    }

    /// Like [`resolve`](Self::resolve), but reports which path was taken.
    pub async fn outcome(&self) -> AuthOutcome {
        self.resolution().await.outcome
    }

    /// Whether an access token is present in the store.
    ///
    /// Performs no validation and no network I/O; only suitable for deciding
    /// what to show, never for authorizing anything.
    pub async fn is_logged_in(&self) -> bool {
        self.read(ACCESS_TOKEN_COOKIE).await.is_some()
    }

    /// Remove both tokens and forget the cached result.
    ///
    /// Store failures are logged; the cache is invalidated regardless.
    pub async fn clear(&self) {
        let config = &self.resolver.config;
        for (name, options) in [
            (ACCESS_TOKEN_COOKIE, config.access_cookie_options()),
            (REFRESH_TOKEN_COOKIE, config.refresh_cookie_options()),
        ] {
            if let Err(e) = self.store.delete(name, &options).await {
                tracing::warn!("Failed to delete {} from store: {}", name, e);
            }
        }
        self.invalidate().await;
        tracing::debug!("Session cleared");
    }

    /// Send a request on behalf of the authenticated caller.
    ///
    /// Returns `None` without sending anything when the caller is not
    /// authenticated. A 401 from the downstream service ends the session and
    /// also yields `None`, as does a transport failure. Any other response,
    /// success or not, is returned as is.
    ///
    /// A `url` starting with `/` is taken relative to the API base URL.
    pub async fn authenticated_fetch(&self, url: &str, options: FetchOptions) -> Option<Response> {
        let resolution = self.resolution().await;
        let access_token = match (resolution.outcome.is_authenticated(), resolution.access_token) {
            (true, Some(token)) => token,
            _ => {
                tracing::debug!("Skipping request to {}: not authenticated", url);
                return None;
            }
        };

        let url = self.absolute_url(url);
        let mut headers = options.headers;
        headers.retain(|name, _| !name.eq_ignore_ascii_case("authorization"));
        headers.insert("Authorization".to_string(), bearer(&access_token));

        let response = match self
            .resolver
            .api
            .http()
            .send(options.method, &url, options.body.as_deref(), &headers)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} {} failed: {}", options.method, url, e);
                return None;
            }
        };

        if response.is_unauthorized() {
            tracing::info!("{} {} returned 401, clearing session", options.method, url);
            self.clear().await;
            return None;
        }

        Some(response)
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.resolver.api.base_url(), url)
        } else {
            url.to_string()
        }
    }

    /// Drop the cached result so the next resolve recomputes.
    pub(super) async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    async fn resolution(&self) -> Resolution {
        // Held across the cascade so concurrent callers share one computation.
        let mut cache = self.cache.lock().await;
        if let Some(resolution) = cache.as_ref() {
            tracing::trace!("Using cached auth resolution");
            return resolution.clone();
        }

        let resolution = self.run_cascade().await;
        tracing::debug!("Resolved auth outcome: {:?}", resolution.outcome);
        *cache = Some(resolution.clone());
        resolution
    }

    async fn run_cascade(&self) -> Resolution {
        let access_token = self.read(ACCESS_TOKEN_COOKIE).await;

        if let Some(token) = access_token.as_deref() {
            match self.resolver.api.validate_token(token).await {
                Ok(true) => return Resolution::authenticated(AuthOutcome::Validated, token.to_string()),
                Ok(false) => tracing::debug!("Access token rejected by validation"),
                Err(e) => tracing::debug!("Access token validation failed: {}", e),
            }
        }

        let Some(refresh_token) = self.read(REFRESH_TOKEN_COOKIE).await else {
            tracing::debug!("No refresh token stored");
            return Resolution::unauthenticated(UnauthenticatedReason::MissingToken);
        };

        let pair = match self.resolver.api.refresh_token(&refresh_token).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::info!("Token refresh failed: {}", e);
                return Resolution::unauthenticated(UnauthenticatedReason::RefreshRejected);
            }
        };

        if let Err(e) = self.persist(&pair, access_token.as_deref()).await {
            tracing::warn!("Refreshed tokens could not be stored: {}", e);
        } else {
            tracing::info!("Access token refreshed");
        }

        Resolution::authenticated(AuthOutcome::Refreshed, pair.access_token)
    }

    /// Write both tokens. If the second write fails the first is undone.
    pub(super) async fn persist(
        &self,
        pair: &CredentialPair,
        previous_access: Option<&str>,
    ) -> Result<(), StoreError> {
        let access_options = self.resolver.config.access_cookie_options();
        let refresh_options = self.resolver.config.refresh_cookie_options();

        self.store
            .set(ACCESS_TOKEN_COOKIE, &pair.access_token, &access_options)
            .await?;

        if let Err(e) = self
            .store
            .set(REFRESH_TOKEN_COOKIE, &pair.refresh_token, &refresh_options)
            .await
        {
            let rollback = match previous_access {
                Some(previous) => {
                    self.store
                        .set(ACCESS_TOKEN_COOKIE, previous, &access_options)
                        .await
                }
                None => self.store.delete(ACCESS_TOKEN_COOKIE, &access_options).await,
            };
            if let Err(rollback_err) = rollback {
                tracing::warn!("Failed to restore access token: {}", rollback_err);
            }
            return Err(e);
        }

        Ok(())
    }

    /// Read a store entry. Read failures and empty values count as absent.
    pub(super) async fn read(&self, name: &str) -> Option<String> {
        match self.store.get(name).await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read {} from store: {}", name, e);
                None
            }
        }
    }
}
