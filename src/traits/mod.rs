//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport used for the identity endpoints and
//!   authenticated downstream requests
//! - [`CredentialStore`] - Cookie-like storage for the token pair

pub mod http;
pub mod store;

pub use http::{Headers, HttpClient, HttpError, Method, Response};
pub use store::{CookieOptions, CredentialStore, SameSite, StoreError};
