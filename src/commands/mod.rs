//! Command dispatch and handlers.

pub mod audit;
pub mod canonicalize;
pub mod check;

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::cli::{Command, RemoteArgs};
use crate::config::Settings;
use crate::context::ServiceContext;

/// Exit status for operational failures (unreadable input, fatal validation).
pub const EXIT_FAILURE: u8 = 2;

/// Dispatch a parsed command to its handler and return the process exit code.
///
/// `PROPAUDIT_RECORD=<path>` records clock, git, and registry interactions to
/// a cassette; `PROPAUDIT_REPLAY=<path>` serves them from one instead.
///
/// # Errors
///
/// Returns an error string if settings are invalid or the command fails.
pub fn dispatch(command: &Command) -> Result<u8, String> {
    let mut settings = Settings::from_env()?;
    if let Some(var) = remote_args(command).and_then(|r| r.token_env.clone()) {
        settings.token_env = var;
    }

    let ctx = if let Some(path) = &settings.replay_path {
        info!(cassette = %path.display(), "replaying port interactions");
        ServiceContext::replaying(path)?
    } else if let Some(path) = &settings.record_path {
        info!(cassette = %path.display(), "recording port interactions");
        ServiceContext::recording(path, &settings)?
    } else {
        ServiceContext::live(&settings)?
    };

    let result = dispatch_with_context(command, &ctx);
    // Write the cassette even when the command failed.
    ctx.flush_recording()?;
    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the command fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<u8, String> {
    match command {
        Command::Canonicalize(args) => canonicalize::run_with_context(ctx, args),
        Command::Audit(args) => audit::run_with_context(ctx, &args.schema, &args.remote),
        Command::Check(args) => check::run_with_context(ctx, args),
    }
}

fn remote_args(command: &Command) -> Option<&RemoteArgs> {
    match command {
        Command::Canonicalize(_) => None,
        Command::Audit(args) => Some(&args.remote),
        Command::Check(args) => Some(&args.remote),
    }
}

/// Reads and parses a JSON document through the filesystem port.
pub(crate) fn read_json<T: DeserializeOwned>(
    ctx: &ServiceContext,
    path: &Path,
    what: &str,
) -> Result<T, String> {
    let content = ctx
        .fs
        .read_to_string(path)
        .map_err(|e| format!("failed to read {what} {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("failed to parse {what} {}: {e}", path.display()))
}

/// Writes `contents` through the filesystem port.
pub(crate) fn write_artifact(
    ctx: &ServiceContext,
    path: &Path,
    contents: &str,
    what: &str,
) -> Result<(), String> {
    ctx.fs
        .write(path, contents)
        .map_err(|e| format!("failed to write {what} {}: {e}", path.display()))?;
    info!(path = %path.display(), "wrote {what}");
    Ok(())
}
