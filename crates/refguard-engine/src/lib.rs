//! RefGuard engine - the checks
//!
//! This crate implements the checks run by the hooks:
//! - Raw table names in SQL scripts
//! - Primary key column descriptions
//! - Snapshot target schema configuration

mod changes;
pub mod outcome;
pub mod primary_key;
pub mod snapshot_schema;
pub mod table_name;

pub use outcome::CheckOutcome;
pub use primary_key::check_primary_key_description;
pub use snapshot_schema::check_snapshot_target_schema;
pub use table_name::{unreadable_file, TableNameCheck};
