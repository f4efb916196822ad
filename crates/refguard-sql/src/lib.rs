//! Raw table name detection for dbt SQL
//!
//! This crate handles:
//! - Stripping SQL and Jinja comments
//! - Padding parentheses and `{{ }}` delimiters
//! - Whitespace tokenization
//! - Classifying FROM/JOIN targets against CTE declarations and EXTRACT calls
//!
//! It works on already-read SQL text and performs no I/O.

pub mod classifier;
pub mod comments;
pub mod scan;
pub mod spacing;
pub mod tokens;
pub mod window;

pub use classifier::{Classification, Classifier};
pub use comments::strip_comments;
pub use scan::{classify, TableScan};
pub use spacing::space_delimiters;
pub use tokens::tokenize;
pub use window::{windows, Window, Windows};
