//! Error category classification.
//!
//! Categories give the CLI one place to decide how to report a failure and
//! which exit code to use.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (connection, DNS, timeout).
    Network,

    /// Authentication errors; the user needs to sign in (again).
    Auth,

    /// Backend errors (HTTP 5xx, unexpected responses).
    Server,

    /// User action required (rejected credentials, bad arguments).
    User,

    /// Filesystem or cookie store errors.
    System,

    /// Missing or invalid configuration.
    Configuration,
}

impl ErrorCategory {
    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Auth => "Run `authstate login` to sign in",
            ErrorCategory::Server => {
                "The server may be experiencing issues. Please try again later"
            }
            ErrorCategory::User => "Please check your input and try again",
            ErrorCategory::System => "Check file permissions and available disk space",
            ErrorCategory::Configuration => "Check the AUTHSTATE_* environment variables",
        }
    }

    /// Process exit code for a CLI run that failed with this category.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCategory::Auth => 2,
            ErrorCategory::User | ErrorCategory::Configuration => 3,
            ErrorCategory::Network | ErrorCategory::Server => 4,
            ErrorCategory::System => 5,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
