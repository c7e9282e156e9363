//! Schema governance for a component library mirrored into a design registry.
//!
//! The pipeline has three stages:
//!
//! 1. [`schema::canonicalize`] merges the extracted raw schema with curated
//!    overrides into a deterministic, invariant-checked canonical schema.
//! 2. [`audit`] compares every canonical component with the live registry
//!    through the [`ports::RemoteRegistry`] capability.
//! 3. [`report`] renders the audit as JSON and Markdown and derives the exit
//!    code.
//!
//! External systems sit behind the traits in [`ports`]; [`adapters`] provides
//! live, recording, and replaying implementations.

pub mod adapters;
pub mod audit;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod manifest;
pub mod ports;
pub mod registry;
pub mod report;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

use clap::Parser;

/// Run the CLI with the provided arguments and return the exit code.
///
/// `--help` and `--version` print to stdout and succeed.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<u8, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(0);
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}
