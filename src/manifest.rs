//! Manifest store: component name to remote node reference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Markers that flag a manifest value as not yet filled in.
const PLACEHOLDER_MARKERS: [&str; 4] = ["todo", "tbd", "placeholder", "xxx"];

/// Where a component lives in the design registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Registry file key.
    #[serde(default)]
    pub file_key: String,
    /// Node id of the component (set) inside the file.
    #[serde(default)]
    pub node_id: String,
    /// Browser URL of the component, for humans.
    #[serde(default)]
    pub component_url: String,
}

/// A manifest entry that is fully wired and ready to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    /// Registry file key.
    pub file_key: String,
    /// Node id in `<a>:<b>` form.
    pub node_id: String,
}

impl ManifestEntry {
    /// Returns `true` if the entry still holds placeholder values.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        is_placeholder_value(&self.file_key) || is_placeholder_value(&self.node_id)
    }

    /// Resolves the entry into a fetchable reference.
    ///
    /// Returns `None` for placeholder entries.
    #[must_use]
    pub fn resolve(&self) -> Option<RemoteRef> {
        if self.is_placeholder() {
            return None;
        }
        Some(RemoteRef {
            file_key: self.file_key.trim().to_string(),
            node_id: normalize_node_id(self.node_id.trim()),
        })
    }
}

/// Converts a share-URL node id (`12-34`) to registry form (`12:34`).
#[must_use]
pub fn normalize_node_id(raw: &str) -> String {
    if raw.contains(':') {
        return raw.to_string();
    }
    match raw.split_once('-') {
        Some((a, b))
            if !a.is_empty()
                && !b.is_empty()
                && a.chars().all(|c| c.is_ascii_digit())
                && b.chars().all(|c| c.is_ascii_digit()) =>
        {
            format!("{a}:{b}")
        }
        _ => raw.to_string(),
    }
}

fn is_placeholder_value(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }
    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        return true;
    }
    let lower = trimmed.to_ascii_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
}

/// Manifest document: component name to entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Creates a manifest from `(name, entry)` pairs.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, ManifestEntry)>,
    {
        Self { entries: entries.into_iter().collect() }
    }

    /// Returns the entry for a component, if any.
    #[must_use]
    pub fn get(&self, component: &str) -> Option<&ManifestEntry> {
        self.entries.get(component)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the manifest is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
