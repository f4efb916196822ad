//! Windowed table-reference classifier
//!
//! Walks the token stream one (previous, current, next) window at a time and
//! sorts identifiers into table candidates and CTE names. This is a lexical
//! heuristic, not a parser: odd formatting can produce false positives or
//! negatives, but the walk never fails.

use crate::window::{windows, Window};
use std::collections::BTreeSet;

/// Keywords whose following token names a table
const TABLE_KEYWORDS: [&str; 2] = ["from", "join"];

/// Tokens that can never be a table name or CTE alias
const IGNORABLE: [&str; 3] = ["", "(", "{{"];

/// Date parts accepted as the first argument of `EXTRACT(part FROM expr)`
const DATE_PARTS: [&str; 9] = [
    "day",
    "month",
    "year",
    "week",
    "dayofyear",
    "dayofweek",
    "isoweek",
    "quarter",
    "isoyear",
];

/// One-shot state armed by `EXTRACT(part` and spent by the next table match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Suppression {
    #[default]
    Idle,
    /// The next FROM/JOIN target belongs to an EXTRACT call
    PendingTable,
}

impl Suppression {
    /// Spend the pending suppression, reporting whether one was armed
    fn take(&mut self) -> bool {
        std::mem::take(self) == Suppression::PendingTable
    }
}

/// Names collected during one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Lowercased identifiers that followed FROM or JOIN
    pub candidates: BTreeSet<String>,

    /// Lowercased aliases declared as `name AS (`
    pub ctes: BTreeSet<String>,
}

impl Classification {
    /// Candidates that are not CTE names
    pub fn table_names(&self) -> BTreeSet<String> {
        self.candidates.difference(&self.ctes).cloned().collect()
    }
}

/// Table-reference classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    /// Drop candidates without a schema qualifier
    dotless: bool,
}

impl Classifier {
    pub fn new(dotless: bool) -> Self {
        Self { dotless }
    }

    /// Classify an ordered token sequence
    pub fn classify(&self, tokens: &[&str]) -> Classification {
        let mut found = Classification::default();
        let mut suppression = Suppression::Idle;

        for window in windows(tokens) {
            if window.previous_is_any(&["extract"]) && window.next_is_any(&DATE_PARTS) {
                suppression = Suppression::PendingTable;
            }

            if window.previous_is_any(&TABLE_KEYWORDS) && !is_ignorable(window.current) {
                if suppression.take() {
                    tracing::trace!(token = window.current, "skipping EXTRACT argument");
                    continue;
                }
                if let Some(table) = self.table_candidate(window.current) {
                    found.candidates.insert(table);
                }
            }

            if let Some(cte) = cte_declaration(&window) {
                found.ctes.insert(cte);
            }
        }

        tracing::debug!(
            candidates = found.candidates.len(),
            ctes = found.ctes.len(),
            "classified tokens"
        );
        found
    }

    /// Normalize a FROM/JOIN target, or reject it in dotless mode
    fn table_candidate(&self, token: &str) -> Option<String> {
        let lowered = token.to_lowercase();
        let trimmed = lowered.trim();
        let name = trimmed.strip_suffix(',').unwrap_or(trimmed);

        if name.is_empty() || (self.dotless && !name.contains('.')) {
            return None;
        }
        Some(name.to_string())
    }
}

/// `previous` when the window reads `previous AS (`
fn cte_declaration(window: &Window<'_>) -> Option<String> {
    if !window.current_is("as") || !window.next?.starts_with('(') {
        return None;
    }
    let alias = window.previous.filter(|prev| !is_ignorable(prev))?;
    Some(alias.to_lowercase())
}

fn is_ignorable(token: &str) -> bool {
    IGNORABLE.iter().any(|ignorable| *ignorable == token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn classify(tokens: &[&str]) -> Classification {
        Classifier::new(false).classify(tokens)
    }

    #[test]
    fn records_from_and_join_targets() {
        let found = classify(&["select", "*", "FROM", "Orders", "JOIN", "raw.items", "on", "x"]);
        assert_eq!(found.candidates, set(&["orders", "raw.items"]));
        assert!(found.ctes.is_empty());
    }

    #[test]
    fn ignores_subqueries_and_macros() {
        let found = classify(&["from", "(", "select", "1", ")", "join", "{{", "ref", "(", "'t'", ")", "}}"]);
        assert!(found.candidates.is_empty());
    }

    #[test]
    fn strips_one_trailing_comma() {
        let found = classify(&["from", "a,", "b"]);
        assert_eq!(found.candidates, set(&["a"]));
    }

    #[test]
    fn lone_comma_is_not_a_table() {
        let found = classify(&["from", ",", "b"]);
        assert!(found.candidates.is_empty());
    }

    #[test]
    fn records_cte_alias() {
        let found = classify(&["with", "Base", "AS", "(", "select", "1", ")"]);
        assert_eq!(found.ctes, set(&["base"]));
    }

    #[test]
    fn cte_needs_parenthesis_after_as() {
        let found = classify(&["select", "a", "as", "b", "from", "t"]);
        assert!(found.ctes.is_empty());
    }

    #[test]
    fn cte_alias_cannot_be_ignorable_or_missing() {
        assert!(classify(&["as", "("]).ctes.is_empty());
        assert!(classify(&["(", "as", "("]).ctes.is_empty());
    }

    #[test]
    fn cte_detection_matches_glued_parenthesis() {
        let found = classify(&["x", "as", "(select"]);
        assert_eq!(found.ctes, set(&["x"]));
    }

    #[test]
    fn table_names_subtract_ctes() {
        let found = classify(&[
            "with", "base", "as", "(", "select", "*", "from", "raw.t", ")", "select", "*", "from", "base",
        ]);
        assert_eq!(found.candidates, set(&["base", "raw.t"]));
        assert_eq!(found.table_names(), set(&["raw.t"]));
    }

    #[test]
    fn extract_suppresses_its_own_from() {
        let found = classify(&[
            "select", "extract", "(", "year", "from", "order_date", ")", "from", "orders",
        ]);
        assert_eq!(found.candidates, set(&["orders"]));
    }

    #[test]
    fn extract_with_unknown_part_is_not_suppressed() {
        let found = classify(&["extract", "(", "epoch", "from", "ts", ")"]);
        assert_eq!(found.candidates, set(&["ts"]));
    }

    #[test]
    fn suppression_is_spent_once() {
        let found = classify(&[
            "extract", "(", "month", "from", "d", ")", "from", "a", "join", "b",
        ]);
        assert_eq!(found.candidates, set(&["a", "b"]));
    }

    #[test]
    fn suppression_survives_ignorable_targets() {
        // The armed flag is only spent by a non-ignorable FROM/JOIN target.
        let found = classify(&["extract", "(", "day", "from", "(", "x", ")", ")", "from", "t"]);
        assert!(found.candidates.is_empty());
    }

    #[test]
    fn dotless_mode_keeps_qualified_names_only() {
        let found = Classifier::new(true).classify(&["from", "orders", "join", "raw.items"]);
        assert_eq!(found.candidates, set(&["raw.items"]));
    }

    #[test]
    fn duplicates_collapse() {
        let found = classify(&["from", "t", "join", "T", "from", "t,"]);
        assert_eq!(found.candidates, set(&["t"]));
    }

    #[test]
    fn suppression_take_clears() {
        let mut s = Suppression::PendingTable;
        assert!(s.take());
        assert_eq!(s, Suppression::Idle);
        assert!(!s.take());
    }
}
