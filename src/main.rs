//! Binary entrypoint for the `propaudit` CLI.

use std::process::ExitCode;

use propaudit::commands::EXIT_FAILURE;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    // stdout is reserved for reports.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match propaudit::run(std::env::args()) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
