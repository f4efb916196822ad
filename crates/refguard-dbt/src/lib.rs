//! dbt artifact parsing
//!
//! This crate handles:
//! - Parsing manifest.json (dbt-generated artifacts)
//! - Matching changed files to manifest models and snapshots
//! - Pulling in the SQL/YAML counterparts of changed files

pub mod manifest;
pub mod paths;

pub use manifest::{ColumnDefinition, Manifest, ManifestError, ManifestMetadata, ManifestNode, NodeConfig, NodeRef};
pub use paths::{missing_file_paths, model_sqls};
