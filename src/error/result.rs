//! Result type alias for session operations.

use super::session_error::SessionError;

/// Type alias for Results using SessionError.
///
/// # Example
///
/// ```ignore
/// use authstate::error::SessionResult;
///
/// async fn status() -> SessionResult<AuthState> {
///     Ok(cycle.resolve().await)
/// }
/// ```
pub type SessionResult<T> = Result<T, SessionError>;
