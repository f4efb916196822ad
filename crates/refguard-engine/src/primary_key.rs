//! Primary key description check
//!
//! Every changed model whose primary-key column (marked with a column tag)
//! lacks a meaningful description is reported once.

use crate::changes::{changed_stems, is_skipped};
use crate::outcome::CheckOutcome;
use refguard_core::{AllowlistRules, Diagnostic, DiagnosticCode, Location, PrimaryKeyRules, Severity};
use refguard_dbt::{ColumnDefinition, Manifest};

/// Check changed models for undocumented primary-key columns
pub fn check_primary_key_description<S: AsRef<str>>(
    paths: &[S],
    manifest: &Manifest,
    rules: &PrimaryKeyRules,
    allowlist: &AllowlistRules,
) -> CheckOutcome {
    let filenames = changed_stems(paths, manifest, allowlist);
    let models: Vec<_> = manifest
        .models(&filenames, false)
        .into_iter()
        .filter(|model| !is_skipped(model, allowlist))
        .collect();

    let mut diagnostics = Vec::new();
    for model in &models {
        let mut undocumented: Vec<&str> = model
            .node
            .columns
            .values()
            .filter(|column| column.has_tag(&rules.tag) && !is_described(column, rules))
            .map(|column| column.name.as_str())
            .collect();

        if undocumented.is_empty() {
            continue;
        }
        undocumented.sort_unstable();

        tracing::debug!(model = model.unique_id, columns = ?undocumented, "missing primary-key description");

        let mut diag = Diagnostic::new(
            DiagnosticCode::ModelMissingPrimaryKeyDescription,
            Severity::Error,
            format!(
                "Model '{}' is missing a {} description for column(s): {}",
                model.name(),
                rules.tag,
                undocumented.join(", ")
            ),
        )
        .with_subjects(vec![model.name().to_string()]);

        if !model.node.original_file_path.is_empty() {
            diag = diag.with_location(Location::new(model.node.original_file_path.clone()));
        }

        diagnostics.push(diag);
    }

    CheckOutcome::new(models.len(), diagnostics)
}

fn is_described(column: &ColumnDefinition, rules: &PrimaryKeyRules) -> bool {
    column.description.trim().chars().count() >= rules.min_description_len
}
