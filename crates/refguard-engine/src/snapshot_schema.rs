//! Snapshot target schema check
//!
//! Snapshots must route their target schema through `generate_schema_name`
//! so every environment writes to its own schema. The check is a plain
//! substring match on the snapshot's unrendered SQL.

use crate::changes::{changed_stems, is_skipped};
use crate::outcome::CheckOutcome;
use refguard_core::{AllowlistRules, Diagnostic, DiagnosticCode, Location, Severity, SnapshotRules};
use refguard_dbt::Manifest;

/// Check changed snapshots for the required target schema config
pub fn check_snapshot_target_schema<S: AsRef<str>>(
    paths: &[S],
    manifest: &Manifest,
    rules: &SnapshotRules,
    allowlist: &AllowlistRules,
) -> CheckOutcome {
    let filenames = changed_stems(paths, manifest, allowlist);
    let snapshots: Vec<_> = manifest
        .snapshots(&filenames)
        .into_iter()
        .filter(|snapshot| !is_skipped(snapshot, allowlist))
        .collect();

    let diagnostics = snapshots
        .iter()
        .filter(|snapshot| !snapshot.node.raw_code.contains(&rules.required_config))
        .map(|snapshot| {
            let file = if snapshot.node.original_file_path.is_empty() {
                snapshot.filename
            } else {
                snapshot.node.original_file_path.as_str()
            };
            tracing::debug!(snapshot = snapshot.unique_id, file, "missing target schema");

            Diagnostic::new(
                DiagnosticCode::SnapshotMissingTargetSchema,
                Severity::Error,
                "is missing target_schema!",
            )
            .with_location(Location::new(file))
            .with_subjects(vec![snapshot.name().to_string()])
        })
        .collect();

    CheckOutcome::new(snapshots.len(), diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest() -> Manifest {
        Manifest::from_str(
            r#"{"nodes": {
                "snapshot.shop.orders_snapshot": {
                    "name": "orders_snapshot",
                    "resource_type": "snapshot",
                    "original_file_path": "snapshots/orders_snapshot.sql",
                    "raw_code": "{% snapshot orders_snapshot %}\n{{ config(target_schema=generate_schema_name('snapshots'), unique_key='id') }}\nselect * from {{ source('shop', 'orders') }}\n{% endsnapshot %}"
                },
                "snapshot.shop.customers_snapshot": {
                    "name": "customers_snapshot",
                    "resource_type": "snapshot",
                    "original_file_path": "snapshots/customers_snapshot.sql",
                    "raw_code": "{% snapshot customers_snapshot %}\n{{ config(target_schema='snapshots') }}\n{% endsnapshot %}"
                },
                "snapshot.shop.legacy_snapshot": {
                    "name": "legacy_snapshot",
                    "raw_sql": "{{ config(target_schema=generate_schema_name('s')) }}"
                },
                "model.shop.orders_snapshot_model": {
                    "name": "orders_snapshot_model",
                    "raw_code": "select 1"
                }
            }}"#,
        )
        .unwrap()
    }

    #[test]
    fn configured_snapshot_passes() {
        let outcome = check_snapshot_target_schema(
            &["snapshots/orders_snapshot.sql"],
            &manifest(),
            &SnapshotRules::default(),
            &AllowlistRules::default(),
        );
        assert_eq!(outcome.checked, 1);
        assert_eq!(outcome.status(), 0);
    }

    #[test]
    fn hardcoded_target_schema_fails() {
        let outcome = check_snapshot_target_schema(
            &["snapshots/orders_snapshot.sql", "snapshots/customers_snapshot.sql"],
            &manifest(),
            &SnapshotRules::default(),
            &AllowlistRules::default(),
        );

        assert_eq!(outcome.checked, 2);
        assert_eq!(outcome.diagnostics.len(), 1);
        let diag = &outcome.diagnostics[0];
        assert_eq!(diag.code, DiagnosticCode::SnapshotMissingTargetSchema);
        assert_eq!(diag.location.as_ref().unwrap().file, "snapshots/customers_snapshot.sql");
    }

    #[test]
    fn legacy_raw_sql_field_is_checked() {
        let outcome = check_snapshot_target_schema(
            &["snapshots/legacy_snapshot.sql"],
            &manifest(),
            &SnapshotRules::default(),
            &AllowlistRules::default(),
        );
        assert_eq!(outcome.checked, 1);
        assert_eq!(outcome.status(), 0);
    }

    #[test]
    fn models_are_not_snapshots() {
        let outcome = check_snapshot_target_schema(
            &["models/orders_snapshot_model.sql"],
            &manifest(),
            &SnapshotRules::default(),
            &AllowlistRules::default(),
        );
        assert_eq!(outcome.checked, 0);
    }

    #[test]
    fn custom_required_config() {
        let rules = SnapshotRules {
            required_config: "unique_key=".to_string(),
        };
        let outcome = check_snapshot_target_schema(
            &["snapshots/orders_snapshot.sql"],
            &manifest(),
            &rules,
            &AllowlistRules::default(),
        );
        assert_eq!(outcome.status(), 0);

        let outcome = check_snapshot_target_schema(
            &["snapshots/customers_snapshot.sql"],
            &manifest(),
            &rules,
            &AllowlistRules::default(),
        );
        assert_eq!(outcome.status(), 1);
    }

    #[test]
    fn allowlisted_snapshot_is_skipped() {
        let allowlist = AllowlistRules {
            skip_files: vec!["snapshots/customers_*".to_string()],
        };
        let outcome = check_snapshot_target_schema(
            &["snapshots/customers_snapshot.sql"],
            &manifest(),
            &SnapshotRules::default(),
            &allowlist,
        );
        assert_eq!(outcome.checked, 0);
        assert_eq!(outcome.status(), 0);
    }
}
