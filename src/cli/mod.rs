//! CLI module.
//!
//! Every invocation is one logical cycle: it builds an [`AuthCycle`] over the
//! file-backed cookie jar, runs a single command, and exits.
//!
//! # Usage
//!
//! ```ignore
//! use authstate::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! let code = runtime.block_on(run_cli_command(command))?;
//! std::process::exit(code);
//! ```
//!
//! [`AuthCycle`]: crate::auth::AuthCycle

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{version_line, VERSION};

use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::adapters::{FileCookieStore, ReqwestHttpClient};
use crate::auth::SessionResolver;
use crate::config::AuthConfig;
use crate::error::{SessionError, SessionResult};

/// Run a parsed command and return the process exit code.
///
/// Configuration comes from the environment (see [`AuthConfig::from_env`]).
pub async fn run_cli_command(command: CliCommand) -> SessionResult<i32> {
    let mut stdout = std::io::stdout();

    match command {
        CliCommand::Version => {
            writeln!(stdout, "{}", version_line())?;
            return Ok(0);
        }
        CliCommand::Help => {
            writeln!(stdout, "{}", USAGE)?;
            return Ok(0);
        }
        CliCommand::Invalid { message } => return Err(SessionError::usage(message)),
        _ => {}
    }

    let config = AuthConfig::from_env();
    let cookie_path = config.cookie_path.clone().ok_or_else(|| {
        SessionError::config("cannot locate the home directory; set AUTHSTATE_COOKIE_PATH")
    })?;
    tracing::debug!(
        "Using API {} and cookie jar {}",
        config.api_url,
        cookie_path.display()
    );

    let http = ReqwestHttpClient::with_timeout(config.request_timeout)?;
    let resolver = SessionResolver::new(config, Arc::new(http));
    let cycle = resolver.begin(FileCookieStore::new(cookie_path));

    match command {
        CliCommand::Status => commands::status(&cycle, &mut stdout).await,
        CliCommand::Check => commands::check(&cycle, &mut stdout).await,
        CliCommand::Login { email } => {
            let email = match email {
                Some(email) => email,
                None => prompt_line("Email: ")?,
            };
            let password = rpassword::prompt_password("Password: ")?;
            commands::login(&cycle, &email, &password, &mut stdout).await
        }
        CliCommand::Logout => commands::logout(&cycle, &mut stdout).await,
        CliCommand::Fetch { method, url, body } => {
            commands::fetch(&cycle, method, &url, body, &mut stdout).await
        }
        CliCommand::Version | CliCommand::Help | CliCommand::Invalid { .. } => Ok(0),
    }
}

/// Prompt on stderr and read one trimmed line from stdin.
fn prompt_line(prompt: &str) -> SessionResult<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", prompt)?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let line = line.trim().to_string();
    if line.is_empty() {
        return Err(SessionError::usage("an email address is required"));
    }
    Ok(line)
}
