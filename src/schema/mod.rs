//! Component schema model: the typed form of the raw and canonical documents.
//!
//! A schema is a list of [`Component`]s, each carrying the [`Param`]s that can
//! be bound to properties in the design registry. The raw document comes from
//! the extractor; the canonical document is produced by
//! [`canonicalize::canonicalize`] and is what the drift auditor consumes.

pub mod canonicalize;
pub mod overrides;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::context::ServiceContext;

/// Revision recorded when the git port cannot resolve `HEAD`.
pub const UNKNOWN_REVISION: &str = "unknown";

/// The kind of value a parameter carries.
///
/// Known kinds are closed variants; anything else the extractor emits is kept
/// verbatim in [`ParamKind::Other`] so documents round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamKind {
    /// Free text.
    Text,
    /// A true/false flag.
    Boolean,
    /// One of a closed set of values.
    Enum,
    /// A nested component slot that can be swapped for another instance.
    InstanceSwap,
    /// Not mirrored into the registry (callbacks, modifiers, content lambdas).
    Excluded,
    /// A kind this tool does not interpret.
    Other(String),
}

impl ParamKind {
    /// Returns the document token for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "TEXT",
            Self::Boolean => "BOOLEAN",
            Self::Enum => "ENUM",
            Self::InstanceSwap => "INSTANCE_SWAP",
            Self::Excluded => "EXCLUDED",
            Self::Other(token) => token,
        }
    }
}

impl From<String> for ParamKind {
    fn from(token: String) -> Self {
        match token.as_str() {
            "TEXT" => Self::Text,
            "BOOLEAN" => Self::Boolean,
            "ENUM" => Self::Enum,
            "INSTANCE_SWAP" => Self::InstanceSwap,
            "EXCLUDED" => Self::Excluded,
            _ => Self::Other(token),
        }
    }
}

impl From<ParamKind> for String {
    fn from(kind: ParamKind) -> Self {
        match kind {
            ParamKind::Other(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a parameter's value is sourced from the design registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BindingField {
    /// Read from a text layer's characters.
    TextCharacters,
    /// Read from a variant axis of the component set.
    VariantAxis,
    /// Read from an instance-swap slot.
    InstanceSwap,
    /// Never read from the registry; the value is a code-side literal.
    PropOnly,
    /// Not resolved yet.
    None,
}

impl BindingField {
    /// Returns the document token for this binding.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextCharacters => "TEXT_CHARACTERS",
            Self::VariantAxis => "VARIANT_AXIS",
            Self::InstanceSwap => "INSTANCE_SWAP",
            Self::PropOnly => "PROP_ONLY",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for BindingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BindingField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::TextCharacters, Self::VariantAxis, Self::InstanceSwap, Self::PropOnly, Self::None]
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown binding field '{s}'"))
    }
}

/// Binding descriptor of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Where the value comes from.
    pub field: BindingField,
}

impl Default for Binding {
    fn default() -> Self {
        Self { field: BindingField::None }
    }
}

/// Marker used to locate the layer a parameter is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerHint {
    /// Layer name marker in the design document.
    pub marker: String,
}

/// A parameter surfaced as a variant axis of the component set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantAxis {
    /// Name of the variant property in the registry.
    pub property_name: String,
    /// Registry option label mapped to the boolean value it stands for.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub value_map: BTreeMap<String, bool>,
}

/// A parameter surfaced as an instance-swap slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSwap {
    /// Layer marker of the swappable instance.
    pub target_layer_marker: String,
    /// Contract the swapped component must satisfy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
}

/// Closed value domain of an enum parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumSpec {
    /// The allowed values, as declared in source.
    pub domain: Vec<String>,
    /// Optional mapping from domain value to generated code template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_map: Option<BTreeMap<String, String>>,
}

/// A bindable parameter of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    /// Parameter name, unique within its component.
    pub name: String,
    /// Value kind.
    pub kind: ParamKind,
    /// Whether the parameter accepts null.
    #[serde(default)]
    pub nullable: bool,
    /// Whether the parameter has no default in source.
    #[serde(default)]
    pub required: bool,
    /// Default value, when one is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Provenance of `default` (e.g. `literal`, `unknown`).
    #[serde(default = "unknown_default_source")]
    pub default_source: String,
    /// Registry binding.
    #[serde(default)]
    pub binding: Binding,
    /// Layer locator hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_hint: Option<LayerHint>,
    /// Variant-axis descriptor for `VARIANT_AXIS` bindings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_axis: Option<VariantAxis>,
    /// Instance-swap descriptor for `INSTANCE_SWAP` bindings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_swap: Option<InstanceSwap>,
    /// Enum domain for `ENUM` parameters.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_spec: Option<EnumSpec>,
    /// Number of arguments a callback parameter receives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_arity: Option<i32>,
}

fn unknown_default_source() -> String {
    "unknown".to_string()
}

impl Param {
    /// Returns the key this parameter is expected under in the registry.
    ///
    /// Variant-axis bindings use the axis property name when one is declared;
    /// everything else uses the parameter name.
    #[must_use]
    pub fn binding_key(&self) -> &str {
        match (&self.binding.field, &self.variant_axis) {
            (BindingField::VariantAxis, Some(axis)) if !axis.property_name.is_empty() => {
                &axis.property_name
            }
            _ => &self.name,
        }
    }

    /// Returns the registry property type this parameter should appear as.
    ///
    /// `None` for kinds that have no registry counterpart.
    #[must_use]
    pub fn expected_remote_type(&self) -> Option<&'static str> {
        if self.binding.field == BindingField::VariantAxis {
            return Some("VARIANT");
        }
        match self.kind {
            ParamKind::Text => Some("TEXT"),
            ParamKind::Boolean => Some("BOOLEAN"),
            ParamKind::Enum => Some("VARIANT"),
            ParamKind::InstanceSwap => Some("INSTANCE_SWAP"),
            ParamKind::Excluded | ParamKind::Other(_) => None,
        }
    }
}

/// A UI component and its bindable parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Component name; unique, used as sort and merge key.
    pub component_name: String,
    /// Fully-qualified source identifier; empty when the extractor omits it.
    #[serde(default, alias = "kotlinFqName")]
    pub qualified_name: String,
    /// Whether the component accepts nested content.
    #[serde(default)]
    pub nestable: bool,
    /// Parameters of the component.
    #[serde(default)]
    pub params: Vec<Param>,
}

/// Raw schema document as emitted by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSchema {
    /// Extracted components, in any order.
    pub components: Vec<Component>,
}

/// Non-authoritative metadata stamped onto a canonical schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStamp {
    /// When the schema was generated.
    pub generated_at: DateTime<Utc>,
    /// Source-control revision the schema was generated from.
    pub revision: String,
}

impl GenerationStamp {
    /// Resolves the stamp from the context's clock and git ports.
    ///
    /// A git failure is not fatal: the revision falls back to
    /// [`UNKNOWN_REVISION`].
    #[must_use]
    pub fn resolve(ctx: &ServiceContext) -> Self {
        let generated_at = ctx.clock.now();
        let revision = match ctx.git.current_commit() {
            Ok(rev) if !rev.trim().is_empty() => rev.trim().to_string(),
            Ok(_) => UNKNOWN_REVISION.to_string(),
            Err(e) => {
                warn!(error = %e, "could not resolve source revision; using fallback");
                UNKNOWN_REVISION.to_string()
            }
        };
        Self { generated_at, revision }
    }
}

/// Deterministically ordered, override-applied, invariant-checked schema.
///
/// Equality ignores the generation stamp: two schemas built from the same
/// inputs at different times compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalSchema {
    /// Generation metadata.
    #[serde(flatten)]
    pub stamp: GenerationStamp,
    /// Components sorted by name, params sorted by name.
    pub components: Vec<Component>,
}

impl PartialEq for CanonicalSchema {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl CanonicalSchema {
    /// Looks up a component by name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.component_name == name)
    }
}
