//! Authentication module.
//!
//! This module provides:
//! - Token pair and auth state types
//! - A client for the REST API's identity endpoints
//! - The per-cycle session resolver (validate → refresh → fail)
//! - Login and logout on top of a cycle

pub mod api;
pub mod credentials;
mod login;
pub mod resolver;

pub use api::{AuthApiClient, AuthApiError, LoginResponse};
pub use credentials::{
    AuthOutcome, AuthState, CredentialPair, UnauthenticatedReason, UserProfile, UserRole,
    ACCESS_TOKEN_COOKIE, PROFILE_COOKIES, REFRESH_TOKEN_COOKIE,
};
pub use resolver::{AuthCycle, FetchOptions, SessionResolver};
