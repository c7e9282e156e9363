//! `propaudit audit` command.

use std::path::Path;

use tracing::info;

use super::{read_json, write_artifact};
use crate::audit::{audit_schema, AuditOptions};
use crate::cli::RemoteArgs;
use crate::context::ServiceContext;
use crate::manifest::Manifest;
use crate::report::render;
use crate::schema::canonicalize::validate;
use crate::schema::CanonicalSchema;

/// Execute the `audit` command against the canonical schema at `schema_path`.
///
/// # Errors
///
/// Returns an error string if an input cannot be read, the schema violates an
/// invariant, or a report cannot be written.
pub fn run_with_context(
    ctx: &ServiceContext,
    schema_path: &Path,
    remote: &RemoteArgs,
) -> Result<u8, String> {
    let schema: CanonicalSchema = read_json(ctx, schema_path, "canonical schema")?;
    // A hand-edited schema must still satisfy the canonical invariants.
    validate(&schema).map_err(|e| format!("schema validation failed: {e}"))?;
    audit_and_report(ctx, &schema, remote)
}

/// Audits `schema`, writes the requested reports, prints Markdown to stdout,
/// and returns the report's exit code.
pub(crate) fn audit_and_report(
    ctx: &ServiceContext,
    schema: &CanonicalSchema,
    remote: &RemoteArgs,
) -> Result<u8, String> {
    let manifest: Manifest = read_json(ctx, &remote.manifest, "manifest")?;
    let options = AuditOptions { ghost_exempt: remote.ghost_exempt.iter().copied().collect() };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    let entries = runtime.block_on(audit_schema(
        schema,
        &manifest,
        ctx.registry.as_ref(),
        ctx.tokens.as_ref(),
        &options,
    ));

    let report = render(&entries).map_err(|e| format!("failed to render report: {e}"))?;
    info!(components = entries.len(), exit_code = report.exit_code, "audit finished");

    if let Some(path) = &remote.json_out {
        write_artifact(ctx, path, &format!("{}\n", report.json), "JSON report")?;
    }
    if let Some(path) = &remote.markdown_out {
        write_artifact(ctx, path, &report.markdown, "Markdown report")?;
    }
    print!("{}", report.markdown);

    Ok(report.exit_code)
}
