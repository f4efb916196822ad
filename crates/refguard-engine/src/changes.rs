//! Changed-file selection shared by the manifest checks

use refguard_core::AllowlistRules;
use refguard_dbt::{missing_file_paths, model_sqls, Manifest, NodeRef};
use std::collections::BTreeSet;

/// File stems of the changed SQL files, after expansion and allowlisting
///
/// The allowlist is applied to the expanded set, so a properties file cannot
/// pull a skipped model back in.
pub(crate) fn changed_stems<S: AsRef<str>>(
    paths: &[S],
    manifest: &Manifest,
    allowlist: &AllowlistRules,
) -> BTreeSet<String> {
    let paths = missing_file_paths(paths, manifest);
    let kept = paths.iter().filter(|path| {
        let skipped = allowlist.is_file_skipped(path);
        if skipped {
            tracing::debug!(file = %path, "skipped by allowlist");
        }
        !skipped
    });

    model_sqls(kept).into_keys().collect()
}

/// Whether the node's own SQL file is allowlisted
pub(crate) fn is_skipped(node: &NodeRef<'_>, allowlist: &AllowlistRules) -> bool {
    let file = &node.node.original_file_path;
    !file.is_empty() && allowlist.is_file_skipped(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest() -> Manifest {
        Manifest::from_str(
            r#"{"nodes": {
                "model.shop.legacy": {
                    "name": "legacy",
                    "original_file_path": "models/legacy/legacy.sql",
                    "patch_path": "shop://models/schema.yml"
                },
                "model.shop.orders": {
                    "name": "orders",
                    "original_file_path": "models/orders.sql",
                    "patch_path": "shop://models/schema.yml"
                }
            }}"#,
        )
        .unwrap()
    }

    fn skip(patterns: &[&str]) -> AllowlistRules {
        AllowlistRules {
            skip_files: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn properties_file_does_not_revive_skipped_models() {
        let stems = changed_stems(&["models/schema.yml"], &manifest(), &skip(&["models/legacy/*"]));
        assert_eq!(stems, BTreeSet::from(["orders".to_string()]));
    }

    #[test]
    fn empty_allowlist_keeps_everything() {
        let stems = changed_stems(&["models/schema.yml"], &manifest(), &AllowlistRules::default());
        assert_eq!(stems.len(), 2);
    }

    #[test]
    fn node_skip_uses_its_own_path() {
        let manifest = manifest();
        let stems = BTreeSet::from(["legacy".to_string(), "orders".to_string()]);
        let models = manifest.models(&stems, false);
        let allowlist = skip(&["models/legacy/*"]);

        let skipped: Vec<bool> = models.iter().map(|m| is_skipped(m, &allowlist)).collect();
        assert_eq!(skipped, vec![true, false]);
    }
}
