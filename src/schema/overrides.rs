//! Override documents and per-field folding onto parameters.

use serde::{Deserialize, Serialize};

use super::{Binding, EnumSpec, InstanceSwap, LayerHint, Param, ParamKind, VariantAxis};

/// A patch selecting one `(component, param)` pair.
///
/// Every `Some` field replaces the corresponding [`Param`] field when folded.
/// `exclude` removes the parameter from canonical output regardless of the
/// other fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    /// Component name selector.
    pub component: String,
    /// Param name selector.
    pub param: String,
    /// Drop the parameter entirely.
    #[serde(default)]
    pub exclude: bool,
    /// Replacement kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParamKind>,
    /// Replacement nullability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Replacement required flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Replacement default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Replacement default provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_source: Option<String>,
    /// Replacement binding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<Binding>,
    /// Replacement layer hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_hint: Option<LayerHint>,
    /// Replacement variant-axis descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_axis: Option<VariantAxis>,
    /// Replacement instance-swap descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_swap: Option<InstanceSwap>,
    /// Replacement enum descriptor.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_spec: Option<EnumSpec>,
    /// Replacement callback arity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_arity: Option<i32>,
}

impl Override {
    /// Returns `true` if this override targets the given component and param.
    #[must_use]
    pub fn selects(&self, component: &str, param: &str) -> bool {
        self.component == component && self.param == param
    }

    /// Folds this override's non-null fields onto `param`.
    pub fn apply_to(&self, param: &mut Param) {
        if let Some(kind) = &self.kind {
            param.kind = kind.clone();
        }
        if let Some(nullable) = self.nullable {
            param.nullable = nullable;
        }
        if let Some(required) = self.required {
            param.required = required;
        }
        // A JSON `null` deserializes to `None`, so it never clears a default.
        if let Some(default) = &self.default {
            param.default = Some(default.clone());
        }
        if let Some(source) = &self.default_source {
            param.default_source.clone_from(source);
        }
        if let Some(binding) = &self.binding {
            param.binding = binding.clone();
        }
        if let Some(hint) = &self.layer_hint {
            param.layer_hint = Some(hint.clone());
        }
        if let Some(axis) = &self.variant_axis {
            param.variant_axis = Some(axis.clone());
        }
        if let Some(swap) = &self.instance_swap {
            param.instance_swap = Some(swap.clone());
        }
        if let Some(spec) = &self.enum_spec {
            param.enum_spec = Some(spec.clone());
        }
        if let Some(arity) = self.callback_arity {
            param.callback_arity = Some(arity);
        }
    }
}

/// Ordered list of overrides. Later entries win per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverrideSet {
    /// Overrides in application order.
    pub overrides: Vec<Override>,
}

/// Accepts both `{"overrides": [...]}` and a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum OverrideDocument {
    Wrapped { overrides: Vec<Override> },
    Bare(Vec<Override>),
}

impl<'de> Deserialize<'de> for OverrideSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let overrides = match OverrideDocument::deserialize(deserializer)? {
            OverrideDocument::Wrapped { overrides } | OverrideDocument::Bare(overrides) => {
                overrides
            }
        };
        Ok(Self { overrides })
    }
}

impl OverrideSet {
    /// Creates a set from overrides in application order.
    #[must_use]
    pub fn new(overrides: Vec<Override>) -> Self {
        Self { overrides }
    }

    /// Returns the overrides targeting `component`, in order.
    pub fn for_component<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a Override> {
        self.overrides.iter().filter(move |o| o.component == component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BindingField;
    use serde_json::json;

    fn base_param() -> Param {
        serde_json::from_value(json!({
            "name": "label",
            "kind": "TEXT",
            "binding": {"field": "NONE"}
        }))
        .unwrap()
    }

    #[test]
    fn later_override_wins_per_field_only() {
        let first = Override {
            component: "Chip".into(),
            param: "label".into(),
            binding: Some(Binding { field: BindingField::TextCharacters }),
            layer_hint: Some(LayerHint { marker: "old".into() }),
            ..Override::default()
        };
        let second = Override {
            component: "Chip".into(),
            param: "label".into(),
            layer_hint: Some(LayerHint { marker: "new".into() }),
            ..Override::default()
        };

        let mut p = base_param();
        first.apply_to(&mut p);
        second.apply_to(&mut p);

        assert_eq!(p.binding.field, BindingField::TextCharacters);
        assert_eq!(p.layer_hint, Some(LayerHint { marker: "new".into() }));
    }

    #[test]
    fn null_default_does_not_clear() {
        let o: Override = serde_json::from_value(json!({
            "component": "Chip", "param": "label", "default": null
        }))
        .unwrap();
        let mut p = base_param();
        p.default = Some(json!("Hi"));
        o.apply_to(&mut p);
        assert_eq!(p.default, Some(json!("Hi")));
    }

    #[test]
    fn parses_wrapped_and_bare_documents() {
        let wrapped: OverrideSet = serde_json::from_value(json!({
            "overrides": [{"component": "A", "param": "a", "exclude": true}]
        }))
        .unwrap();
        let bare: OverrideSet =
            serde_json::from_value(json!([{"component": "A", "param": "a", "exclude": true}]))
                .unwrap();
        assert_eq!(wrapped, bare);
        assert!(wrapped.overrides[0].exclude);
    }

    #[test]
    fn for_component_keeps_order() {
        let set = OverrideSet::new(vec![
            Override { component: "A".into(), param: "x".into(), ..Override::default() },
            Override { component: "B".into(), param: "y".into(), ..Override::default() },
            Override { component: "A".into(), param: "z".into(), ..Override::default() },
        ]);
        let params: Vec<&str> = set.for_component("A").map(|o| o.param.as_str()).collect();
        assert_eq!(params, vec!["x", "z"]);
    }
}
