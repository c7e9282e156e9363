//! Drift auditor: compares canonical components with the live registry.
//!
//! Each component is audited independently in a single pass:
//!
//! ```text
//! manifest entry? ──no──▶ [SKIPPED] (OK)
//!       │yes
//! token available? ──no──▶ [SKIPPED] (OK, no fetch)
//!       │yes
//! fetch ──http/transport error──▶ [SKIPPED] (OK)
//!       ├──parse error──▶ [SKIPPED] (OK)
//!       │ok
//! six diff rules ──▶ errors? ISSUES : OK
//! ```
//!
//! Unavailable remote data only ever produces warnings; errors come from the
//! diff rules alone.

mod rules;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::FetchError;
use crate::manifest::{Manifest, ManifestEntry};
use crate::ports::{RemoteRegistry, TokenProvider};
use crate::schema::{BindingField, CanonicalSchema, Component};

/// Maximum number of body characters embedded in an HTTP-error warning.
pub const BODY_SNIPPET_LIMIT: usize = 200;

/// Outcome class of one component audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftStatus {
    /// No errors (warnings allowed).
    Ok,
    /// At least one error.
    Issues,
}

/// Audit result for one component.
///
/// `issues` is not stored: it is always `errors` followed by `warnings`,
/// emitted on serialization and recomputed on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DriftEntryDoc", from = "DriftEntryDoc")]
pub struct DriftEntry {
    /// Component name.
    pub component_name: String,
    /// Overall status.
    pub status: DriftStatus,
    /// Drift errors, sorted.
    pub errors: Vec<String>,
    /// Warnings, sorted.
    pub warnings: Vec<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriftEntryDoc {
    component_name: String,
    status: DriftStatus,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    warnings: Vec<String>,
    #[serde(default)]
    issues: Vec<String>,
}

impl From<DriftEntry> for DriftEntryDoc {
    fn from(entry: DriftEntry) -> Self {
        let issues = entry.issues();
        Self {
            component_name: entry.component_name,
            status: entry.status,
            errors: entry.errors,
            warnings: entry.warnings,
            issues,
        }
    }
}

impl From<DriftEntryDoc> for DriftEntry {
    fn from(doc: DriftEntryDoc) -> Self {
        Self::new(doc.component_name, doc.errors, doc.warnings)
    }
}

impl DriftEntry {
    /// Builds an entry, sorting messages and deriving the status.
    #[must_use]
    pub fn new(component_name: String, mut errors: Vec<String>, mut warnings: Vec<String>) -> Self {
        errors.sort();
        warnings.sort();
        let status = if errors.is_empty() { DriftStatus::Ok } else { DriftStatus::Issues };
        Self { component_name, status, errors, warnings }
    }

    /// Builds an OK entry carrying a single warning.
    #[must_use]
    pub fn skipped(component_name: &str, warning: String) -> Self {
        Self::new(component_name.to_string(), Vec::new(), vec![warning])
    }

    /// Errors followed by warnings.
    #[must_use]
    pub fn issues(&self) -> Vec<String> {
        self.errors.iter().chain(&self.warnings).cloned().collect()
    }
}

/// Policy knobs for the diff rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOptions {
    /// Binding fields allowed to be defined remotely without any layer reference.
    pub ghost_exempt: BTreeSet<BindingField>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self { ghost_exempt: [BindingField::PropOnly, BindingField::VariantAxis].into() }
    }
}

/// Audits one component against the registry.
///
/// `registry` and `tokens` are the only side channels; the fetch is not invoked
/// unless the manifest entry resolves and a token is available.
pub async fn audit_component(
    component: &Component,
    entry: Option<&ManifestEntry>,
    registry: &dyn RemoteRegistry,
    tokens: &dyn TokenProvider,
    options: &AuditOptions,
) -> DriftEntry {
    let name = component.component_name.as_str();

    let Some(remote_ref) = entry.and_then(ManifestEntry::resolve) else {
        warn!(component = name, "no wired manifest entry; skipping");
        return DriftEntry::skipped(
            name,
            format!("[SKIPPED] no wired manifest entry for '{name}'"),
        );
    };

    let Some(token) = tokens.token().filter(|t| !t.trim().is_empty()) else {
        warn!(component = name, source = tokens.source(), "no registry token; skipping");
        return DriftEntry::skipped(
            name,
            format!("[SKIPPED] {} is not set; remote check not run", tokens.source()),
        );
    };

    let remote = match registry
        .fetch_component(&remote_ref.file_key, &remote_ref.node_id, &token)
        .await
    {
        Ok(remote) => remote,
        Err(err) => {
            warn!(component = name, error = %err, "registry fetch failed; skipping");
            return DriftEntry::skipped(name, fetch_failure_warning(&err));
        }
    };

    let findings = rules::diff_component(component, &remote, options);
    let entry = DriftEntry::new(name.to_string(), findings.errors, findings.warnings);
    info!(
        component = name,
        errors = entry.errors.len(),
        warnings = entry.warnings.len(),
        "component audited"
    );
    entry
}

/// Audits every component of a schema, in schema order.
pub async fn audit_schema(
    schema: &CanonicalSchema,
    manifest: &Manifest,
    registry: &dyn RemoteRegistry,
    tokens: &dyn TokenProvider,
    options: &AuditOptions,
) -> Vec<DriftEntry> {
    let mut entries = Vec::with_capacity(schema.components.len());
    for component in &schema.components {
        let entry = manifest.get(&component.component_name);
        entries.push(audit_component(component, entry, registry, tokens, options).await);
    }
    entries
}

fn fetch_failure_warning(err: &FetchError) -> String {
    match err {
        FetchError::Http { status, body } => format!(
            "[SKIPPED] registry fetch failed (http={status}): {}",
            body_snippet(body)
        ),
        FetchError::Parse { message } => {
            format!("[SKIPPED] registry payload could not be parsed: {message}")
        }
        FetchError::Transport { message } => {
            format!("[SKIPPED] registry request failed: {}", body_snippet(message))
        }
    }
}

/// Collapses `body` to one line and truncates it.
fn body_snippet(body: &str) -> String {
    let line = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.chars().count() <= BODY_SNIPPET_LIMIT {
        return line;
    }
    let mut cut: String = line.chars().take(BODY_SNIPPET_LIMIT).collect();
    cut.push_str("...");
    cut
}
