//! Command-line argument parsing.
//!
//! The CLI is small enough that arguments are matched by hand:
//!
//! ```text
//! authstate status
//! authstate check
//! authstate login [EMAIL]
//! authstate logout
//! authstate fetch [-X METHOD] [-d BODY] URL
//! authstate --version | --help
//! ```

use crate::traits::Method;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Resolve and print the auth state (may refresh)
    Status,
    /// Report whether an access token is stored, without network I/O
    Check,
    /// Sign in; the email is prompted for when omitted
    Login { email: Option<String> },
    /// Sign out
    Logout,
    /// Send an authenticated request
    Fetch {
        method: Method,
        url: String,
        body: Option<String>,
    },
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// The arguments could not be understood
    Invalid { message: String },
}

/// Usage text printed by `--help` and after invalid arguments.
pub const USAGE: &str = "\
Usage: authstate <command>

Commands:
  status                          Resolve the session, refreshing it if needed
  check                           Report whether an access token is stored
  login [EMAIL]                   Sign in (the password is prompted for)
  logout                          Sign out and forget the stored profile
  fetch [-X METHOD] [-d BODY] URL Send an authenticated request

Options:
  -V, --version                   Show version information
  -h, --help                      Show this help";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use authstate::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["authstate".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    if args
        .iter()
        .any(|arg| arg == "--version" || arg == "-V")
    {
        return CliCommand::Version;
    }
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return CliCommand::Help;
    }

    let Some((command, rest)) = args.split_first() else {
        return CliCommand::Help;
    };

    match command.as_str() {
        "status" => no_extra_args(CliCommand::Status, rest),
        "check" => no_extra_args(CliCommand::Check, rest),
        "logout" => no_extra_args(CliCommand::Logout, rest),
        "login" => match rest {
            [] => CliCommand::Login { email: None },
            [email] => CliCommand::Login {
                email: Some(email.clone()),
            },
            _ => invalid("login takes at most one argument"),
        },
        "fetch" => parse_fetch(rest),
        other => invalid(format!("unknown command '{}'", other)),
    }
}

fn parse_fetch(args: &[String]) -> CliCommand {
    let mut method = Method::Get;
    let mut body = None;
    let mut url = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-X" | "--method" => match iter.next().map(|m| parse_method(m)) {
                Some(Some(m)) => method = m,
                Some(None) => return invalid("unsupported HTTP method"),
                None => return invalid("-X requires a method"),
            },
            "-d" | "--data" => match iter.next() {
                Some(data) => body = Some(data.clone()),
                None => return invalid("-d requires a body"),
            },
            flag if flag.starts_with('-') => {
                return invalid(format!("unknown option '{}'", flag));
            }
            value => {
                if url.is_some() {
                    return invalid("fetch takes a single URL");
                }
                url = Some(value.to_string());
            }
        }
    }

    match url {
        Some(url) => CliCommand::Fetch { method, url, body },
        None => invalid("fetch requires a URL"),
    }
}

fn parse_method(value: &str) -> Option<Method> {
    match value.to_ascii_uppercase().as_str() {
        "GET" => Some(Method::Get),
        "POST" => Some(Method::Post),
        "PUT" => Some(Method::Put),
        "PATCH" => Some(Method::Patch),
        "DELETE" => Some(Method::Delete),
        _ => None,
    }
}

fn no_extra_args(command: CliCommand, rest: &[String]) -> CliCommand {
    if rest.is_empty() {
        command
    } else {
        invalid(format!("unexpected argument '{}'", rest[0]))
    }
}

fn invalid(message: impl Into<String>) -> CliCommand {
    CliCommand::Invalid {
        message: message.into(),
    }
}
