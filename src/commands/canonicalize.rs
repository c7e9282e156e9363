//! `propaudit canonicalize` command.

use tracing::info;

use super::{read_json, write_artifact};
use crate::cli::CanonicalizeArgs;
use crate::context::ServiceContext;
use crate::schema::canonicalize::{canonicalize, Canonicalized};
use crate::schema::overrides::OverrideSet;
use crate::schema::{CanonicalSchema, GenerationStamp, RawSchema};

/// Execute the `canonicalize` command.
///
/// # Errors
///
/// Returns an error string if an input cannot be read, an invariant is
/// violated, or the output cannot be written.
pub fn run_with_context(ctx: &ServiceContext, args: &CanonicalizeArgs) -> Result<u8, String> {
    let schema = build(ctx, args)?;
    let json = to_json(&schema)?;
    match &args.out {
        Some(path) => write_artifact(ctx, path, &json, "canonical schema")?,
        None => print!("{json}"),
    }
    Ok(0)
}

/// Reads the inputs named by `args` and canonicalizes them.
pub(crate) fn build(
    ctx: &ServiceContext,
    args: &CanonicalizeArgs,
) -> Result<CanonicalSchema, String> {
    let raw: RawSchema = read_json(ctx, &args.raw, "raw schema")?;
    let overrides: OverrideSet = match &args.overrides {
        Some(path) => read_json(ctx, path, "overrides")?,
        None => OverrideSet::default(),
    };

    let stamp = GenerationStamp::resolve(ctx);
    let Canonicalized { schema, unmatched_overrides } =
        canonicalize(raw, &overrides, stamp).map_err(|e| format!("schema validation failed: {e}"))?;

    info!(
        components = schema.components.len(),
        unmatched_overrides = unmatched_overrides.len(),
        revision = %schema.stamp.revision,
        "schema canonicalized"
    );
    Ok(schema)
}

/// Pretty JSON with a trailing newline.
pub(crate) fn to_json(schema: &CanonicalSchema) -> Result<String, String> {
    serde_json::to_string_pretty(schema)
        .map(|json| format!("{json}\n"))
        .map_err(|e| format!("failed to serialize canonical schema: {e}"))
}
