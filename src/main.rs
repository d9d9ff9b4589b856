use authstate::cli::{parse_args, run_cli_command, USAGE};
use authstate::error::SessionError;

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `authstate=debug`.
const LOG_ENV: &str = "AUTHSTATE_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(err: &SessionError) -> i32 {
    let category = err.category();
    tracing::debug!("{} failed with {}: {}", category, err.error_code(), err);

    eprintln!("Error: {}", err.user_message());
    if matches!(err, SessionError::Usage { .. }) {
        eprintln!("\n{}", USAGE);
    } else {
        eprintln!("Hint: {}", category.recovery_hint());
    }
    category.exit_code()
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let command = parse_args(std::env::args());

    let runtime = tokio::runtime::Runtime::new()?;
    let code = match runtime.block_on(run_cli_command(command)) {
        Ok(code) => code,
        Err(err) => report(&err),
    };
    drop(runtime);

    std::process::exit(code);
}
