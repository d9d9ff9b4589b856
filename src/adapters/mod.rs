//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`MemoryCookieStore`] - Request-scoped cookie jar that reports `Set-Cookie` changes
//! - [`FileCookieStore`] - JSON-file cookie jar shared by CLI invocations
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockCookieStore`] - Recording store with failure injection

pub mod file_store;
pub mod memory_store;
pub mod mock;
pub mod reqwest_http;

pub use file_store::FileCookieStore;
pub use memory_store::MemoryCookieStore;
pub use mock::{MockCookieStore, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
