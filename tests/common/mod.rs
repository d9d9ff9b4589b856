//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! use common::{resolver_for, store_with_pair, MockApiConfig};
//!
//! let mock = MockApiConfig::new().with_validate(true).build();
//! let cycle = resolver_for(&mock).begin(store_with_pair());
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;

use authstate::auth::SessionResolver;
use authstate::config::AuthConfig;

/// Base URL the mock identity API lives at.
pub const API_BASE: &str = "http://api.test";

pub const STORED_ACCESS_TOKEN: &str = "stored-access-token";
pub const STORED_REFRESH_TOKEN: &str = "stored-refresh-token";
pub const REFRESHED_ACCESS_TOKEN: &str = "new-access-token";
pub const REFRESHED_REFRESH_TOKEN: &str = "new-refresh-token";

/// Config pointing at [`API_BASE`].
pub fn test_config() -> AuthConfig {
    AuthConfig::new().with_api_url(API_BASE)
}

/// A resolver over a mock transport.
pub fn resolver_for(mock: &MockHttpClient) -> SessionResolver<MockHttpClient> {
    SessionResolver::new(test_config(), Arc::new(mock.clone()))
}

/// A store holding both tokens.
pub fn store_with_pair() -> MockCookieStore {
    MockCookieStore::with_entries(&[
        ("access_token", STORED_ACCESS_TOKEN),
        ("refresh_token", STORED_REFRESH_TOKEN),
    ])
}

/// A store holding only the refresh token.
pub fn store_with_refresh_only() -> MockCookieStore {
    MockCookieStore::with_entries(&[("refresh_token", STORED_REFRESH_TOKEN)])
}
