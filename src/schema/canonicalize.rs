//! Canonicalizer: merges raw descriptors with overrides, orders, and validates.
//!
//! The pass is pure and single-shot:
//!
//! 1. Components are re-keyed by name (a later duplicate replaces an earlier
//!    one wholesale), which also sorts them.
//! 2. Each param gets the overrides selecting it folded on in list order. Any
//!    selecting override with `exclude` drops the param.
//! 3. Params are re-keyed and sorted by name.
//! 4. The generation stamp is attached.
//! 5. Invariants are checked over every surviving param; the first violation
//!    aborts with a [`ValidationError`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use super::overrides::{Override, OverrideSet};
use super::{BindingField, CanonicalSchema, Component, GenerationStamp, Param, ParamKind, RawSchema};
use crate::error::ValidationError;

/// Outcome of a canonicalization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Canonicalized {
    /// The canonical schema.
    pub schema: CanonicalSchema,
    /// Overrides that selected no param, as `component.param`.
    pub unmatched_overrides: Vec<String>,
}

/// Builds the canonical schema from a raw document and an override set.
///
/// # Errors
///
/// Returns a [`ValidationError`] for the first param that violates a
/// structural invariant after overrides are applied.
pub fn canonicalize(
    raw: RawSchema,
    overrides: &OverrideSet,
    stamp: GenerationStamp,
) -> Result<Canonicalized, ValidationError> {
    let mut by_name: BTreeMap<String, Component> = BTreeMap::new();
    for component in raw.components {
        if by_name.contains_key(&component.component_name) {
            debug!(component = %component.component_name, "duplicate component replaced");
        }
        by_name.insert(component.component_name.clone(), component);
    }

    let mut matched: BTreeSet<(String, String)> = BTreeSet::new();
    let components: Vec<Component> = by_name
        .into_values()
        .map(|component| merge_component(component, overrides, &mut matched))
        .collect();

    let unmatched_overrides = unmatched(overrides, &matched);
    for selector in &unmatched_overrides {
        warn!(selector = %selector, "override matches no extracted param");
    }

    let schema = CanonicalSchema { stamp, components };
    validate(&schema)?;

    debug!(
        components = schema.components.len(),
        params = schema.components.iter().map(|c| c.params.len()).sum::<usize>(),
        "canonical schema built"
    );

    Ok(Canonicalized { schema, unmatched_overrides })
}

/// Applies the overrides for one component and sorts its params.
fn merge_component(
    mut component: Component,
    overrides: &OverrideSet,
    matched: &mut BTreeSet<(String, String)>,
) -> Component {
    let selected: Vec<&Override> = overrides.for_component(&component.component_name).collect();

    let mut params: BTreeMap<String, Param> = BTreeMap::new();
    for mut param in std::mem::take(&mut component.params) {
        let mine: Vec<&&Override> =
            selected.iter().filter(|o| o.param == param.name).collect();
        if !mine.is_empty() {
            matched.insert((component.component_name.clone(), param.name.clone()));
        }

        if mine.iter().any(|o| o.exclude) {
            debug!(component = %component.component_name, param = %param.name, "param excluded");
            params.remove(&param.name);
            continue;
        }

        for o in mine {
            o.apply_to(&mut param);
        }
        params.insert(param.name.clone(), param);
    }

    component.params = params.into_values().collect();
    component
}

/// Selectors of overrides that matched no param, sorted and listed once.
fn unmatched(overrides: &OverrideSet, matched: &BTreeSet<(String, String)>) -> Vec<String> {
    let selectors: BTreeSet<String> = overrides
        .overrides
        .iter()
        .filter(|o| !matched.contains(&(o.component.clone(), o.param.clone())))
        .map(|o| format!("{}.{}", o.component, o.param))
        .collect();
    selectors.into_iter().collect()
}

/// Checks every param of every component against the structural invariants.
///
/// # Errors
///
/// Returns the first violation found, in canonical order.
pub fn validate(schema: &CanonicalSchema) -> Result<(), ValidationError> {
    for component in &schema.components {
        for param in &component.params {
            check_param(&component.component_name, param)?;
        }
    }
    Ok(())
}

fn check_param(component: &str, param: &Param) -> Result<(), ValidationError> {
    let ids = || (component.to_string(), param.name.clone());

    if param.kind == ParamKind::Boolean
        && param.binding.field == BindingField::VariantAxis
        && param.variant_axis.as_ref().map_or(true, |axis| axis.value_map.is_empty())
    {
        let (component, param) = ids();
        return Err(ValidationError::MissingValueMap { component, param });
    }

    if param.binding.field == BindingField::PropOnly
        && param.required
        && param.default.as_ref().map_or(true, serde_json::Value::is_null)
    {
        let (component, param) = ids();
        return Err(ValidationError::MissingPropOnlyDefault { component, param });
    }

    if param.kind == ParamKind::Excluded
        && param.binding.field == BindingField::None
        && param.required
        && !param.callback_arity.is_some_and(|arity| arity >= 0)
    {
        let (component, param) = ids();
        return Err(ValidationError::MissingCallbackArity { component, param });
    }

    Ok(())
}
