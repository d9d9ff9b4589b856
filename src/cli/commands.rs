//! Command handlers.
//!
//! Each handler works on an [`AuthCycle`] and writes its report to `out`, so
//! the same code runs against the file jar in the binary and against mocks
//! in tests. Handlers return the process exit code on success.

use std::io::Write;

use crate::auth::{AuthCycle, FetchOptions};
use crate::error::{AuthError, ErrorCategory, SessionResult};
use crate::traits::{CredentialStore, HttpClient, Method};

/// Exit code for a negative answer that is not an error (`check`).
pub const EXIT_NEGATIVE: i32 = 1;

/// `status`: resolve the session and print the state as JSON.
pub async fn status<C, S, W>(cycle: &AuthCycle<C, S>, out: &mut W) -> SessionResult<i32>
where
    C: HttpClient,
    S: CredentialStore,
    W: Write,
{
    let state = cycle.resolve().await;
    let json = serde_json::to_string_pretty(&state)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    writeln!(out, "{}", json)?;

    Ok(if state.is_authenticated {
        0
    } else {
        ErrorCategory::Auth.exit_code()
    })
}

/// `check`: report whether an access token is stored. No network I/O.
pub async fn check<C, S, W>(cycle: &AuthCycle<C, S>, out: &mut W) -> SessionResult<i32>
where
    C: HttpClient,
    S: CredentialStore,
    W: Write,
{
    if cycle.is_logged_in().await {
        match cycle.stored_profile().await {
            Some(profile) => writeln!(out, "Logged in as {} <{}>", profile.nickname, profile.email)?,
            None => writeln!(out, "Logged in")?,
        }
        Ok(0)
    } else {
        writeln!(out, "Not logged in")?;
        Ok(EXIT_NEGATIVE)
    }
}

/// `login`: sign in with the given credentials.
pub async fn login<C, S, W>(
    cycle: &AuthCycle<C, S>,
    email: &str,
    password: &str,
    out: &mut W,
) -> SessionResult<i32>
where
    C: HttpClient,
    S: CredentialStore,
    W: Write,
{
    let profile = cycle.login(email, password).await?;
    writeln!(out, "Signed in as {} <{}>", profile.nickname, profile.email)?;
    Ok(0)
}

/// `logout`: clear the session.
pub async fn logout<C, S, W>(cycle: &AuthCycle<C, S>, out: &mut W) -> SessionResult<i32>
where
    C: HttpClient,
    S: CredentialStore,
    W: Write,
{
    cycle.logout().await;
    writeln!(out, "Signed out")?;
    Ok(0)
}

/// `fetch`: send an authenticated request and print the response body.
///
/// Non-2xx responses are printed too; the exit code reports them.
pub async fn fetch<C, S, W>(
    cycle: &AuthCycle<C, S>,
    method: Method,
    url: &str,
    body: Option<String>,
    out: &mut W,
) -> SessionResult<i32>
where
    C: HttpClient,
    S: CredentialStore,
    W: Write,
{
    let options = match body {
        Some(body) => FetchOptions::new()
            .with_method(method)
            .with_header("Content-Type", "application/json")
            .with_body(body),
        None => FetchOptions::new().with_method(method),
    };

    let response = cycle
        .authenticated_fetch(url, options)
        .await
        .ok_or(AuthError::NotAuthenticated)?;

    out.write_all(&response.body)?;
    if !response.body.ends_with(b"\n") {
        writeln!(out)?;
    }

    if response.is_success() {
        Ok(0)
    } else {
        tracing::info!("{} {} returned {}", method, url, response.status);
        Ok(EXIT_NEGATIVE)
    }
}
