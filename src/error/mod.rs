//! Error handling.
//!
//! - **Error Categories**: high-level classification used for CLI reporting
//! - **AuthError**: failures of login and other fallible session operations
//! - **SessionError**: unified error wrapping auth, transport, store and
//!   configuration failures
//! - **SessionResult**: result alias over `SessionError`
//!
//! Resolution (`AuthCycle::resolve`, `AuthCycle::authenticated_fetch`) never
//! returns these; it reports problems as an unauthenticated state instead.
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, DNS, timeout | Yes |
//! | Auth | Not signed in, session expired | No |
//! | Server | Backend errors (5xx) | Yes |
//! | User | Rejected credentials, bad arguments | No |
//! | System | Cookie jar / filesystem errors | No |
//! | Configuration | Bad `AUTHSTATE_*` settings | No |

mod auth;
mod category;
mod result;
mod session_error;

pub use auth::{AuthError, DEFAULT_LOGIN_REJECTED};
pub use category::ErrorCategory;
pub use result::SessionResult;
pub use session_error::SessionError;
