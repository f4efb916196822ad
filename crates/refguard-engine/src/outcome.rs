//! Result of running one check over a set of files or nodes

use refguard_core::{Diagnostic, Report, Severity, SeverityThreshold};

/// Diagnostics produced by a check, plus how much it looked at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckOutcome {
    /// Files or manifest nodes inspected
    pub checked: usize,

    /// Diagnostics produced by the check
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckOutcome {
    pub fn new(checked: usize, diagnostics: Vec<Diagnostic>) -> Self {
        Self { checked, diagnostics }
    }

    /// Merge another outcome into this one
    pub fn extend(&mut self, other: CheckOutcome) {
        self.checked += other.checked;
        self.diagnostics.extend(other.diagnostics);
    }

    /// Rewrite severities according to configured overrides
    pub fn with_overrides(mut self, thresholds: &SeverityThreshold) -> Self {
        self.diagnostics = self
            .diagnostics
            .into_iter()
            .map(|d| thresholds.apply(d))
            .collect();
        self
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warn).count()
    }

    /// Hook status: 1 when any error was produced, else 0
    pub fn status(&self) -> i32 {
        i32::from(self.has_errors())
    }

    /// Build the versioned report for this outcome
    pub fn into_report(self, check: impl Into<String>) -> Report {
        Report::from_diagnostics(check, self.diagnostics).with_checked(self.checked)
    }
}
