//! Configuration schema (refguard.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};

/// Default tag marking a column as the model's primary key
pub const DEFAULT_PRIMARY_KEY_TAG: &str = "primary-key";

/// Default configuration string a snapshot must contain
pub const DEFAULT_SNAPSHOT_CONFIG: &str = "target_schema=generate_schema_name";

/// Settings for the raw table name check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNameRules {
    /// Ignore unqualified (schema-less) table names
    #[serde(default)]
    pub ignore_dotless_table: bool,
}

/// Settings for the primary key description check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyRules {
    /// Column tag that marks the primary key
    #[serde(default = "default_primary_key_tag")]
    pub tag: String,

    /// Minimum number of non-whitespace characters in the description
    #[serde(default = "default_min_description_len")]
    pub min_description_len: usize,
}

fn default_primary_key_tag() -> String {
    DEFAULT_PRIMARY_KEY_TAG.to_string()
}

fn default_min_description_len() -> usize {
    2
}

impl Default for PrimaryKeyRules {
    fn default() -> Self {
        Self {
            tag: default_primary_key_tag(),
            min_description_len: default_min_description_len(),
        }
    }
}

/// Settings for the snapshot target schema check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRules {
    /// String the snapshot's raw SQL must contain
    #[serde(default = "default_snapshot_config")]
    pub required_config: String,
}

fn default_snapshot_config() -> String {
    DEFAULT_SNAPSHOT_CONFIG.to_string()
}

impl Default for SnapshotRules {
    fn default() -> Self {
        Self {
            required_config: default_snapshot_config(),
        }
    }
}

/// Severity threshold overrides for specific diagnostic codes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of diagnostic code to severity override
    #[serde(default)]
    pub overrides: HashMap<String, Severity>,
}

impl SeverityThreshold {
    /// Get severity for a diagnostic code, or default
    pub fn get_severity(&self, code: DiagnosticCode, default: Severity) -> Severity {
        self.overrides
            .get(code.as_str())
            .copied()
            .unwrap_or(default)
    }

    /// Set severity override for a code
    pub fn set_override(&mut self, code: DiagnosticCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }

    /// Apply the configured override, if any, to a diagnostic
    pub fn apply(&self, diagnostic: Diagnostic) -> Diagnostic {
        let severity = self.get_severity(diagnostic.code, diagnostic.severity);
        diagnostic.with_severity(severity)
    }
}

/// Allowlist rules for specific files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowlistRules {
    /// Completely skip checks for these files (glob patterns)
    #[serde(default)]
    pub skip_files: Vec<String>,
}

impl AllowlistRules {
    /// Check if a file should be skipped
    pub fn is_file_skipped(&self, file: &str) -> bool {
        self.skip_files.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, file)
            } else {
                pattern == file
            }
        })
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Raw table name check
    #[serde(default)]
    pub table_name: TableNameRules,

    /// Primary key description check
    #[serde(default)]
    pub primary_key: PrimaryKeyRules,

    /// Snapshot target schema check
    #[serde(default)]
    pub snapshot: SnapshotRules,

    /// Severity thresholds
    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Allowlist rules
    #[serde(default)]
    pub allowlist: AllowlistRules,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Simple glob matching (supports a single * wildcard)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = pattern[star_pos..].trim_start_matches('*');

        text.len() >= prefix.len() + suffix.len()
            && text.starts_with(prefix)
            && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
