//! dbt manifest.json parsing
//!
//! Parses dbt-generated manifest.json to extract models, snapshots and their
//! column metadata.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// dbt manifest.json structure (subset of fields we care about)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Metadata about the manifest
    #[serde(default)]
    pub metadata: Option<ManifestMetadata>,

    /// Model, snapshot and test nodes
    #[serde(default)]
    pub nodes: HashMap<String, ManifestNode>,
}

impl Manifest {
    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::IoError(path.display().to_string(), e.to_string()))?;

        let manifest = Self::from_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            nodes = manifest.nodes.len(),
            dbt_version = manifest.metadata.as_ref().map(|m| m.dbt_version.as_str()),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Parse manifest from JSON string
    pub fn from_str(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json)
            .map_err(|e| ManifestError::ParseError(e.to_string()))
    }

    /// Enabled models whose file stem is among `filenames`, sorted by unique_id
    ///
    /// Ephemeral models are skipped unless `include_ephemeral` is set.
    pub fn models(&self, filenames: &BTreeSet<String>, include_ephemeral: bool) -> Vec<NodeRef<'_>> {
        self.nodes_of_kind("model", filenames)
            .into_iter()
            .filter(|node_ref| include_ephemeral || !node_ref.node.is_ephemeral())
            .collect()
    }

    /// Enabled snapshots whose file stem is among `filenames`, sorted by unique_id
    pub fn snapshots(&self, filenames: &BTreeSet<String>) -> Vec<NodeRef<'_>> {
        self.nodes_of_kind("snapshot", filenames)
    }

    fn nodes_of_kind(&self, kind: &str, filenames: &BTreeSet<String>) -> Vec<NodeRef<'_>> {
        let mut found: Vec<NodeRef<'_>> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.config.enabled)
            .filter_map(|(unique_id, node)| {
                let mut segments = unique_id.split('.');
                if segments.next() != Some(kind) {
                    return None;
                }
                let filename = segments.last()?;
                filenames.contains(filename).then(|| NodeRef {
                    unique_id: unique_id.as_str(),
                    filename,
                    node,
                })
            })
            .collect();

        found.sort_by(|a, b| a.unique_id.cmp(b.unique_id));
        found
    }
}

/// A manifest node matched against a changed file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRef<'a> {
    /// Manifest key, e.g. "model.jaffle_shop.orders"
    pub unique_id: &'a str,

    /// Last segment of the key; matches the SQL file stem
    pub filename: &'a str,

    pub node: &'a ManifestNode,
}

impl NodeRef<'_> {
    /// Display name, falling back to the file stem for nameless nodes
    pub fn name(&self) -> &str {
        if self.node.name.is_empty() {
            self.filename
        } else {
            &self.node.name
        }
    }
}

/// Manifest metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default)]
    pub dbt_schema_version: String,
    #[serde(default)]
    pub dbt_version: String,
    #[serde(default)]
    pub generated_at: String,
}

/// A node in the manifest (model, test, snapshot, etc.)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Node name (e.g., "users")
    #[serde(default)]
    pub name: String,

    /// Resource type (model, test, snapshot, etc.)
    #[serde(default)]
    pub resource_type: String,

    /// Relative path to SQL file
    #[serde(default)]
    pub path: String,

    /// Original file path
    #[serde(default)]
    pub original_file_path: String,

    /// Properties file, e.g. "jaffle_shop://models/schema.yml"
    #[serde(default)]
    pub patch_path: Option<String>,

    /// Node configuration
    #[serde(default)]
    pub config: NodeConfig,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Column definitions
    #[serde(default)]
    pub columns: HashMap<String, ColumnDefinition>,

    /// Unrendered SQL body (`raw_sql` before dbt 1.3)
    #[serde(default, alias = "raw_sql")]
    pub raw_code: String,
}

impl ManifestNode {
    /// Whether the node is materialized as ephemeral
    pub fn is_ephemeral(&self) -> bool {
        self.config.materialized.as_deref() == Some("ephemeral")
    }

    /// Properties file path with the `package://` prefix removed
    pub fn patch_file(&self) -> Option<&str> {
        let patch_path = self.patch_path.as_deref()?;
        Some(match patch_path.split_once("://") {
            Some((_, file)) => file,
            None => patch_path,
        })
    }
}

/// Node configuration (from dbt_project.yml or model config)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Whether the node is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Materialization type
    #[serde(default)]
    pub materialized: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            materialized: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Column definition from manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Column tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ColumnDefinition {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Manifest parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse manifest JSON: {0}")]
    ParseError(String),
}
