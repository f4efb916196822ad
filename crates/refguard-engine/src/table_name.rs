//! Raw table name check for SQL scripts
//!
//! Wraps the lexical scanner from `refguard-sql` and turns its result into a
//! diagnostic for the file.

use refguard_core::{Diagnostic, DiagnosticCode, Location, Severity, TableNameRules};
use refguard_sql::classify;
use std::collections::BTreeSet;

/// Result of checking one SQL file
#[derive(Debug, Clone, PartialEq)]
pub struct TableNameCheck {
    /// File the SQL was read from
    pub file: String,

    /// Raw table names found, sorted
    pub tables: BTreeSet<String>,
}

impl TableNameCheck {
    /// Scan `sql` read from `file`
    pub fn check(file: impl Into<String>, sql: &str, rules: &TableNameRules) -> Self {
        let file = file.into();
        let scan = classify(sql, rules.ignore_dotless_table);

        tracing::debug!(file = %file, tables = scan.tables.len(), "scanned SQL file");

        Self {
            file,
            tables: scan.tables,
        }
    }

    /// Hook status: 1 when any raw table name was found, else 0
    pub fn status(&self) -> i32 {
        i32::from(!self.tables.is_empty())
    }

    /// Diagnostic for this file, if it references raw tables
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        if self.tables.is_empty() {
            return None;
        }

        let diag = Diagnostic::new(
            DiagnosticCode::ScriptHasTableName,
            Severity::Error,
            "does not use source() or ref() macros for tables",
        )
        .with_location(Location::new(self.file.clone()))
        .with_subjects(self.tables.iter().cloned().collect());

        Some(diag)
    }
}

/// Diagnostic for a SQL file that could not be read
pub fn unreadable_file(file: impl Into<String>, error: impl std::fmt::Display) -> Diagnostic {
    let file = file.into();
    Diagnostic::new(
        DiagnosticCode::ScriptUnreadable,
        Severity::Error,
        format!("Failed to read SQL file {}: {}", file, error),
    )
    .with_location(Location::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_file_has_no_diagnostic() {
        let check = TableNameCheck::check(
            "models/orders.sql",
            "select * from {{ ref('stg_orders') }}",
            &TableNameRules::default(),
        );

        assert_eq!(check.status(), 0);
        assert!(check.diagnostic().is_none());
    }

    #[test]
    fn raw_tables_become_one_diagnostic() {
        let check = TableNameCheck::check(
            "models/orders.sql",
            "select * from raw.orders o join raw.items i on o.id = i.order_id",
            &TableNameRules::default(),
        );

        assert_eq!(check.status(), 1);
        let diag = check.diagnostic().unwrap();
        assert_eq!(diag.code, DiagnosticCode::ScriptHasTableName);
        assert_eq!(diag.location.unwrap().file, "models/orders.sql");
        assert_eq!(diag.subjects, vec!["raw.items".to_string(), "raw.orders".to_string()]);
    }

    #[test]
    fn dotless_rule_is_honoured() {
        let rules = TableNameRules {
            ignore_dotless_table: true,
        };
        let check = TableNameCheck::check("models/x.sql", "select * from orders", &rules);
        assert_eq!(check.status(), 0);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let diag = unreadable_file("models/missing.sql", "No such file or directory");
        assert_eq!(diag.code, DiagnosticCode::ScriptUnreadable);
        assert_eq!(diag.severity, Severity::Error);
        assert!(diag.message.contains("models/missing.sql"));
    }
}
