//! Raw table name scan over a whole SQL file

use crate::classifier::Classifier;
use crate::comments::strip_comments;
use crate::spacing::space_delimiters;
use crate::tokens::tokenize;
use std::collections::BTreeSet;

/// Tables referenced without `source()` / `ref()`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableScan {
    /// Lowercased raw table names, sorted
    pub tables: BTreeSet<String>,
}

impl TableScan {
    /// Hook status: 1 when any raw table name was found, else 0
    pub fn status(&self) -> i32 {
        i32::from(!self.tables.is_empty())
    }

    pub fn is_clean(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn into_parts(self) -> (i32, BTreeSet<String>) {
        (self.status(), self.tables)
    }
}

/// Scan one file's SQL for raw table references
///
/// With `dotless` set, unqualified names are assumed to be CTEs or aliases and
/// are not reported.
pub fn classify(sql: &str, dotless: bool) -> TableScan {
    let without_comments = strip_comments(sql);
    let spaced = space_delimiters(&without_comments);
    let tokens = tokenize(&spaced);

    let tables = Classifier::new(dotless).classify(&tokens).table_names();
    TableScan { tables }
}
