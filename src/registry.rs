//! Remote registry payloads: property definitions and layer references.
//!
//! The registry's node endpoint returns a document tree. Definitions live on
//! the component (set) node; references are scattered over its descendants as
//! `componentPropertyReferences` maps whose values are property keys.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Separator between a property name and its registry-assigned suffix.
pub const KEY_SEPARATOR: char = '#';

/// A property definition as the registry reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProperty {
    /// Registry type token (`TEXT`, `BOOLEAN`, `VARIANT`, `INSTANCE_SWAP`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Enumerated option labels, when the registry exposes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Everything the auditor needs to know about one remote component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteComponent {
    /// Definitions keyed by normalized property key.
    pub definitions: BTreeMap<String, RemoteProperty>,
    /// Normalized keys wired to at least one layer.
    pub references: BTreeSet<String>,
}

/// Strips the disambiguation suffix from a registry property key.
///
/// `label#12:0` becomes `label`; keys without a separator are unchanged.
#[must_use]
pub fn normalize_key(key: &str) -> &str {
    key.split(KEY_SEPARATOR).next().unwrap_or(key)
}

/// One node of the registry document tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    /// Property definitions declared on this node.
    #[serde(default)]
    pub component_property_definitions: BTreeMap<String, DefinitionDoc>,
    /// Property references by layer field (`characters`, `visible`, ...).
    #[serde(default)]
    pub component_property_references: BTreeMap<String, String>,
    /// Child nodes.
    #[serde(default)]
    pub children: Vec<DocumentNode>,
}

/// Raw definition entry inside a [`DocumentNode`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionDoc {
    /// Registry type token.
    #[serde(rename = "type")]
    pub kind: String,
    /// Variant options, present for `VARIANT` definitions.
    #[serde(default)]
    pub variant_options: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct NodesResponse {
    #[serde(default)]
    nodes: BTreeMap<String, Option<NodeEnvelope>>,
}

#[derive(Deserialize)]
struct NodeEnvelope {
    document: Option<serde_json::Value>,
}

impl DocumentNode {
    /// Collects every normalized reference key in this subtree.
    #[must_use]
    pub fn collect_references(&self) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        let mut stack: Vec<&DocumentNode> = vec![self];
        while let Some(node) = stack.pop() {
            for key in node.component_property_references.values() {
                keys.insert(normalize_key(key).to_string());
            }
            stack.extend(node.children.iter());
        }
        keys
    }

    /// Builds the auditor view of this node.
    #[must_use]
    pub fn to_remote_component(&self) -> RemoteComponent {
        let definitions = self
            .component_property_definitions
            .iter()
            .map(|(key, def)| {
                (
                    normalize_key(key).to_string(),
                    RemoteProperty { kind: def.kind.clone(), options: def.variant_options.clone() },
                )
            })
            .collect();
        RemoteComponent { definitions, references: self.collect_references() }
    }
}

/// Parses a node-endpoint response body for `node_id`.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if the body is not JSON, the node is absent,
/// or its document has an unexpected shape.
pub fn parse_nodes_response(body: &str, node_id: &str) -> Result<RemoteComponent, FetchError> {
    let response: NodesResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::parse(format!("invalid JSON: {e}")))?;

    let envelope = response
        .nodes
        .get(node_id)
        .and_then(Option::as_ref)
        .ok_or_else(|| FetchError::parse(format!("node {node_id} not present in response")))?;

    let document = envelope
        .document
        .as_ref()
        .filter(|d| d.is_object())
        .ok_or_else(|| FetchError::parse(format!("node {node_id} has no document object")))?;

    let node: DocumentNode = serde_json::from_value(document.clone())
        .map_err(|e| FetchError::parse(format!("node {node_id} document: {e}")))?;

    Ok(node.to_remote_component())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_suffixed_keys() {
        assert_eq!(normalize_key("label#12:0"), "label");
        assert_eq!(normalize_key("Checked"), "Checked");
        assert_eq!(normalize_key("a#b#c"), "a");
    }

    #[test]
    fn collects_references_from_nested_children() {
        let node: DocumentNode = serde_json::from_value(json!({
            "children": [
                {"componentPropertyReferences": {"characters": "label#1:0"}},
                {"children": [
                    {"componentPropertyReferences": {"visible": "showIcon#2:0", "mainComponent": "icon#3:1"}}
                ]}
            ]
        }))
        .unwrap();

        let refs = node.collect_references();
        let expected: BTreeSet<String> =
            ["icon", "label", "showIcon"].into_iter().map(String::from).collect();
        assert_eq!(refs, expected);
    }

    #[test]
    fn parses_definitions_and_options() {
        let body = json!({
            "nodes": {
                "1:2": {
                    "document": {
                        "componentPropertyDefinitions": {
                            "label#1:0": {"type": "TEXT", "defaultValue": "Hi"},
                            "Checked": {"type": "VARIANT", "defaultValue": "On", "variantOptions": ["On", "Off"]}
                        },
                        "children": [
                            {"componentPropertyReferences": {"characters": "label#1:0"}}
                        ]
                    }
                }
            }
        })
        .to_string();

        let remote = parse_nodes_response(&body, "1:2").unwrap();
        assert_eq!(remote.definitions["label"].kind, "TEXT");
        assert_eq!(remote.definitions["label"].options, None);
        assert_eq!(
            remote.definitions["Checked"].options,
            Some(vec!["On".to_string(), "Off".to_string()])
        );
        assert!(remote.references.contains("label"));
    }

    #[test]
    fn missing_node_is_parse_error() {
        let body = json!({"nodes": {"9:9": null}}).to_string();
        let err = parse_nodes_response(&body, "9:9").unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[test]
    fn non_json_is_parse_error() {
        let err = parse_nodes_response("<html>", "1:2").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }
}
