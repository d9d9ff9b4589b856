//! authstate - session resolution and token refresh for the boards front end
//!
//! Decides whether a caller is authenticated by validating the stored access
//! token, transparently refreshing it with the refresh token when needed,
//! and keeping the cookie store consistent. Results are memoized per cycle.

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod traits;
