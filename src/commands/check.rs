//! `propaudit check` command: canonicalize, then audit the result.

use super::audit::audit_and_report;
use super::canonicalize::{build, to_json};
use super::write_artifact;
use crate::cli::CheckArgs;
use crate::context::ServiceContext;

/// Execute the `check` command.
///
/// A validation failure aborts before any registry call. The canonical schema
/// is written only when `--out` is given; stdout carries the Markdown report.
///
/// # Errors
///
/// Returns an error string if canonicalization fails or a file cannot be
/// read or written.
pub fn run_with_context(ctx: &ServiceContext, args: &CheckArgs) -> Result<u8, String> {
    let schema = build(ctx, &args.canonicalize)?;
    if let Some(path) = &args.canonicalize.out {
        write_artifact(ctx, path, &to_json(&schema)?, "canonical schema")?;
    }
    audit_and_report(ctx, &schema, &args.remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::credentials::StaticTokenProvider;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::cli::{CanonicalizeArgs, RemoteArgs};
    use crate::schema::BindingField;
    use crate::test_support::{CannedRegistry, FailingGit, FixedClock};
    use serde_json::json;

    fn args(dir: &std::path::Path, raw: &serde_json::Value, manifest: &serde_json::Value) -> CheckArgs {
        std::fs::create_dir_all(dir).unwrap();
        let raw_path = dir.join("raw.json");
        std::fs::write(&raw_path, raw.to_string()).unwrap();
        let manifest_path = dir.join("manifest.json");
        std::fs::write(&manifest_path, manifest.to_string()).unwrap();

        CheckArgs {
            canonicalize: CanonicalizeArgs {
                raw: raw_path,
                overrides: None,
                out: Some(dir.join("canonical.json")),
            },
            remote: RemoteArgs {
                manifest: manifest_path,
                json_out: Some(dir.join("drift.json")),
                markdown_out: Some(dir.join("drift.md")),
                token_env: None,
                ghost_exempt: vec![BindingField::PropOnly, BindingField::VariantAxis],
            },
        }
    }

    fn ctx(registry: CannedRegistry) -> ServiceContext {
        ServiceContext::new(
            Box::new(FixedClock),
            Box::new(FailingGit),
            Box::new(LiveFileSystem),
            Box::new(registry),
            Box::new(StaticTokenProvider::new(Some("t0k".into()), "TEST_TOKEN")),
        )
    }

    #[test]
    fn drift_yields_exit_code_one_and_reports() {
        let dir = std::env::temp_dir().join("propaudit_cmd_check_drift");
        let raw = json!({"components": [{"componentName": "Chip", "params": [
            {"name": "label", "kind": "TEXT", "binding": {"field": "TEXT_CHARACTERS"}}
        ]}]});
        let manifest = json!({"Chip": {"fileKey": "F1", "nodeId": "1-2"}});
        let registry = CannedRegistry::ok(json!({
            "definitions": {"label": {"type": "TEXT"}, "tone": {"type": "TEXT"}},
            "references": ["label", "tone"]
        }));
        let calls = registry.call_counter();
        let args = args(&dir, &raw, &manifest);

        assert_eq!(run_with_context(&ctx(registry), &args), Ok(1));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        let md = std::fs::read_to_string(dir.join("drift.md")).unwrap();
        assert!(md.contains("## Chip (ISSUES)"));
        assert!(md.contains("- ERROR: [EXTRA] property 'tone' is defined remotely but not in schema"));
        assert!(dir.join("canonical.json").exists());
        assert!(dir.join("drift.json").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn validation_failure_aborts_before_fetch() {
        let dir = std::env::temp_dir().join("propaudit_cmd_check_invalid");
        let raw = json!({"components": [{"componentName": "Checkbox", "params": [
            {"name": "checked", "kind": "BOOLEAN", "binding": {"field": "VARIANT_AXIS"}}
        ]}]});
        let manifest = json!({"Checkbox": {"fileKey": "F1", "nodeId": "1:2"}});
        let registry = CannedRegistry::ok(json!({"definitions": {}, "references": []}));
        let calls = registry.call_counter();
        let args = args(&dir, &raw, &manifest);

        let err = run_with_context(&ctx(registry), &args).unwrap_err();
        assert!(err.contains("schema validation failed"));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert!(!dir.join("drift.json").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
