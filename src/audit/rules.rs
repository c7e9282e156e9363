//! The six diff rules comparing a canonical component with remote data.

use std::collections::{BTreeMap, BTreeSet};

use crate::registry::RemoteComponent;
use crate::schema::{BindingField, Component, Param, ParamKind};

use super::AuditOptions;

/// Errors and warnings accumulated by the rules.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Runs every rule over `component` and returns the combined findings.
pub(crate) fn diff_component(
    component: &Component,
    remote: &RemoteComponent,
    options: &AuditOptions,
) -> Findings {
    let mut findings = Findings::default();

    // First param wins when two params claim the same key; the rest are
    // reported once and left out of every other rule.
    let mut by_key: BTreeMap<&str, &Param> = BTreeMap::new();
    for param in &component.params {
        let key = param.binding_key();
        match by_key.get(key) {
            Some(first) => findings.errors.push(format!(
                "[DUPLICATE_KEY] property '{key}' is bound by params '{}' and '{}'",
                first.name, param.name
            )),
            None => {
                by_key.insert(key, param);
            }
        }
    }

    check_none_bindings(component, &mut findings);
    check_missing(&by_key, remote, &mut findings);
    check_extra(&by_key, remote, &mut findings);
    check_types(&by_key, remote, &mut findings);
    check_ghosts(&by_key, remote, options, &mut findings);
    check_variant_domains(&by_key, remote, &mut findings);

    findings
}

/// Params that take part in the registry comparison.
fn is_expected(param: &Param) -> bool {
    param.kind != ParamKind::Excluded && param.binding.field != BindingField::PropOnly
}

fn check_none_bindings(component: &Component, findings: &mut Findings) {
    for param in &component.params {
        if param.kind != ParamKind::Excluded && param.binding.field == BindingField::None {
            findings.errors.push(format!(
                "[NONE_BINDING] param '{}' has no registry binding; add an override",
                param.name
            ));
        }
    }
}

fn check_missing(by_key: &BTreeMap<&str, &Param>, remote: &RemoteComponent, findings: &mut Findings) {
    for (key, _) in by_key.iter().filter(|(_, p)| is_expected(p)) {
        if !remote.definitions.contains_key(*key) {
            findings.errors.push(format!(
                "[MISSING] property '{key}' expected by schema is not defined remotely"
            ));
        }
    }
}

fn check_extra(by_key: &BTreeMap<&str, &Param>, remote: &RemoteComponent, findings: &mut Findings) {
    for key in remote.definitions.keys() {
        if !by_key.contains_key(key.as_str()) {
            findings
                .errors
                .push(format!("[EXTRA] property '{key}' is defined remotely but not in schema"));
        }
    }
}

/// Applies to every param with a remote counterpart, prop-only ones included.
fn check_types(by_key: &BTreeMap<&str, &Param>, remote: &RemoteComponent, findings: &mut Findings) {
    for (key, param) in by_key {
        let Some(expected) = param.expected_remote_type() else {
            continue;
        };
        let Some(def) = remote.definitions.get(*key) else {
            continue;
        };
        if def.kind != expected {
            findings.errors.push(format!(
                "[TYPE_MISMATCH] property '{key}' expected {expected} got {}",
                def.kind
            ));
        }
    }
}

fn check_ghosts(
    by_key: &BTreeMap<&str, &Param>,
    remote: &RemoteComponent,
    options: &AuditOptions,
    findings: &mut Findings,
) {
    for key in remote.definitions.keys() {
        let Some(param) = by_key.get(key.as_str()) else {
            continue;
        };
        if remote.references.contains(key) || options.ghost_exempt.contains(&param.binding.field) {
            continue;
        }
        findings.errors.push(format!(
            "[GHOST] property '{key}' is defined remotely but not referenced by any layer"
        ));
    }
}

fn check_variant_domains(
    by_key: &BTreeMap<&str, &Param>,
    remote: &RemoteComponent,
    findings: &mut Findings,
) {
    for (key, param) in by_key {
        if param.binding.field != BindingField::VariantAxis {
            continue;
        }
        let Some(options) = remote.definitions.get(*key).and_then(|d| d.options.as_ref()) else {
            findings.warnings.push(format!(
                "[SKIPPED] variant-domain check for '{key}': remote options unavailable"
            ));
            continue;
        };

        let expected = expected_labels(param);
        if expected.is_empty() {
            continue;
        }
        let remote_labels: BTreeSet<&str> = options.iter().map(String::as_str).collect();

        for label in expected.difference(&remote_labels) {
            findings.errors.push(format!(
                "[MISSING] variant option '{label}' of '{key}' is not a remote option"
            ));
        }
        for label in remote_labels.difference(&expected) {
            findings.errors.push(format!(
                "[EXTRA] variant option '{label}' of '{key}' is not mapped in schema"
            ));
        }
    }
}

/// Option labels the schema declares for a variant-axis param.
fn expected_labels(param: &Param) -> BTreeSet<&str> {
    if let Some(axis) = &param.variant_axis {
        if !axis.value_map.is_empty() {
            return axis.value_map.keys().map(String::as_str).collect();
        }
    }
    param
        .enum_spec
        .as_ref()
        .map(|spec| spec.domain.iter().map(String::as_str).collect())
        .unwrap_or_default()
}
