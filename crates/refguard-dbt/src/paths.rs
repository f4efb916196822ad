//! Changed-file resolution against the manifest
//!
//! Pre-commit hands us only the files that changed. A model's SQL and its
//! properties YAML live in different files, so a change to either one has to
//! pull in the other before manifest checks run.

use crate::manifest::Manifest;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Expand changed paths with their manifest counterparts
///
/// - a changed `.sql` file adds the properties file of the matching model
/// - a changed `.yml`/`.yaml` file adds the SQL file of every model it patches
pub fn missing_file_paths<S: AsRef<str>>(paths: &[S], manifest: &Manifest) -> BTreeSet<String> {
    let mut resolved: BTreeSet<String> = paths.iter().map(|p| p.as_ref().to_string()).collect();

    for path in paths {
        let path = path.as_ref();
        match extension(path).as_deref() {
            Some("sql") => {
                let Some(stem) = file_stem(path) else { continue };
                let stems = BTreeSet::from([stem]);
                for model in manifest.models(&stems, true) {
                    if let Some(patch) = model.node.patch_file() {
                        tracing::debug!(sql = path, patch, "adding properties file");
                        resolved.insert(patch.to_string());
                    }
                }
            }
            Some("yml" | "yaml") => {
                for node in manifest.nodes.values() {
                    if node.patch_file() == Some(path) && !node.original_file_path.is_empty() {
                        tracing::debug!(yml = path, sql = %node.original_file_path, "adding patched model");
                        resolved.insert(node.original_file_path.clone());
                    }
                }
            }
            _ => {}
        }
    }

    resolved
}

/// SQL files among `paths`, keyed by file stem
pub fn model_sqls<I, S>(paths: I) -> BTreeMap<String, PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paths
        .into_iter()
        .filter(|p| extension(p.as_ref()).as_deref() == Some("sql"))
        .filter_map(|p| {
            let path = PathBuf::from(p.as_ref());
            let stem = file_stem(p.as_ref())?;
            Some((stem, path))
        })
        .collect()
}

fn extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn file_stem(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
