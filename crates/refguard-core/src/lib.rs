//! RefGuard Core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use report::{Report, ReportSummary, ReportVersion};
pub use config::{
    AllowlistRules, Config, ConfigError, PrimaryKeyRules, SeverityThreshold, SnapshotRules,
    TableNameRules,
};
