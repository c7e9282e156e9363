//! Report rendering: JSON document, Markdown summary, and exit code.

use serde::Serialize;

use crate::audit::{DriftEntry, DriftStatus};
use crate::error::ReportError;

/// Aggregate counts over a set of drift entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Components audited.
    pub components_checked: usize,
    /// Errors across all components.
    pub total_errors: usize,
    /// Warnings across all components.
    pub total_warnings: usize,
    /// Components with at least one error.
    pub components_with_errors: usize,
    /// Components with at least one warning.
    pub components_with_warnings: usize,
    /// `true` when there are no errors.
    pub pass: bool,
}

impl ReportSummary {
    /// Computes the summary of `entries`.
    #[must_use]
    pub fn of(entries: &[DriftEntry]) -> Self {
        let total_errors = entries.iter().map(|e| e.errors.len()).sum();
        Self {
            components_checked: entries.len(),
            total_errors,
            total_warnings: entries.iter().map(|e| e.warnings.len()).sum(),
            components_with_errors: entries.iter().filter(|e| !e.errors.is_empty()).count(),
            components_with_warnings: entries.iter().filter(|e| !e.warnings.is_empty()).count(),
            pass: total_errors == 0,
        }
    }

    /// Process exit status: 1 if any error exists, else 0.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.pass)
    }
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    summary: &'a ReportSummary,
    components: &'a [DriftEntry],
}

/// A rendered drift report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    /// Machine-readable report.
    pub json: String,
    /// Human-readable report.
    pub markdown: String,
    /// Process exit status.
    pub exit_code: u8,
}

/// Renders `entries` into JSON, Markdown, and an exit code.
///
/// Warnings never influence the exit code.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if JSON serialization fails.
pub fn render(entries: &[DriftEntry]) -> Result<RenderedReport, ReportError> {
    let summary = ReportSummary::of(entries);
    let document = ReportDocument { summary: &summary, components: entries };
    let json = serde_json::to_string_pretty(&document)?;
    let markdown = render_markdown(&summary, entries);
    Ok(RenderedReport { json, markdown, exit_code: summary.exit_code() })
}

fn render_markdown(summary: &ReportSummary, entries: &[DriftEntry]) -> String {
    let mut lines = vec![
        "# Schema Drift Report".to_string(),
        String::new(),
        format!("- Components checked: {}", summary.components_checked),
        format!("- Total errors: {}", summary.total_errors),
        format!("- Total warnings: {}", summary.total_warnings),
        format!("- Components with errors: {}", summary.components_with_errors),
        format!("- Components with warnings: {}", summary.components_with_warnings),
        format!("- Result: **{}**", if summary.pass { "PASS" } else { "FAIL" }),
    ];

    for entry in entries {
        let status = match entry.status {
            DriftStatus::Ok => "OK",
            DriftStatus::Issues => "ISSUES",
        };
        lines.push(String::new());
        lines.push(format!("## {} ({status})", entry.component_name));
        lines.push(String::new());

        if entry.errors.is_empty() && entry.warnings.is_empty() {
            lines.push("- No issues.".to_string());
            continue;
        }
        for error in &entry.errors {
            lines.push(format!("- ERROR: {error}"));
        }
        for warning in &entry.warnings {
            lines.push(format!("- WARNING: {warning}"));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, errors: &[&str], warnings: &[&str]) -> DriftEntry {
        DriftEntry::new(
            name.into(),
            errors.iter().map(|s| (*s).to_string()).collect(),
            warnings.iter().map(|s| (*s).to_string()).collect(),
        )
    }

    #[test]
    fn warnings_alone_pass() {
        let entries = vec![
            entry("A", &[], &["[SKIPPED] a", "[SKIPPED] b"]),
            entry("B", &[], &["[SKIPPED] c"]),
        ];
        let report = render(&entries).unwrap();
        assert_eq!(report.exit_code, 0);
        assert!(report.markdown.contains("- Result: **PASS**"));
        assert!(report.markdown.contains("- Total warnings: 3"));
    }

    #[test]
    fn any_error_fails() {
        let entries = vec![entry("A", &[], &[]), entry("B", &["[EXTRA] x"], &[])];
        let report = render(&entries).unwrap();
        assert_eq!(report.exit_code, 1);
        assert!(report.markdown.contains("- Result: **FAIL**"));
        assert!(report.markdown.contains("- Components with errors: 1"));
    }

    #[test]
    fn empty_input_passes() {
        let report = render(&[]).unwrap();
        assert_eq!(report.exit_code, 0);
        assert!(report.markdown.contains("- Components checked: 0"));
    }

    #[test]
    fn markdown_lists_errors_before_warnings() {
        let entries = vec![
            entry("Checkbox", &["[MISSING] m"], &["[SKIPPED] s"]),
            entry("Chip", &[], &[]),
        ];
        let md = render(&entries).unwrap().markdown;

        assert!(md.contains("## Checkbox (ISSUES)"));
        assert!(md.contains("## Chip (OK)"));
        let err_at = md.find("- ERROR: [MISSING] m").unwrap();
        let warn_at = md.find("- WARNING: [SKIPPED] s").unwrap();
        assert!(err_at < warn_at);
        let chip = &md[md.find("## Chip").unwrap()..];
        assert!(chip.contains("- No issues."));
    }

    #[test]
    fn json_carries_summary_and_issues() {
        let entries = vec![entry("A", &["[GHOST] g"], &["[SKIPPED] s"])];
        let report = render(&entries).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&report.json).unwrap();

        assert_eq!(doc["summary"]["totalErrors"], 1);
        assert_eq!(doc["summary"]["pass"], false);
        assert_eq!(doc["components"][0]["issues"][0], "[GHOST] g");
        assert_eq!(doc["components"][0]["issues"][1], "[SKIPPED] s");

        let parsed: Vec<DriftEntry> =
            serde_json::from_value(doc["components"].clone()).unwrap();
        assert_eq!(parsed, entries);
    }
}
