//! Comment removal
//!
//! Strips SQL block comments (`/* ... */`), Jinja comments (`{# ... #}`) and
//! line comments (`-- ...`) before tokenization.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Block comments are non-greedy, span newlines and run to end of text when
/// unterminated. Alternation is leftmost-first, so whichever comment opens
/// first wins: a `--` inside a block comment never starts a line comment.
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(?P<block>/\*.*?(?:\*/|\z)|\{#.*?(?:#\}|\z))|(?P<line>[ \t]*--[^\n]*)")
        .expect("comment pattern is valid")
});

/// Remove all comments from `sql`
///
/// Block comments become a single space so the text on either side cannot
/// fuse into one token. Line comments are removed up to, not including, the
/// newline.
pub fn strip_comments(sql: &str) -> Cow<'_, str> {
    COMMENT_RE.replace_all(sql, |caps: &Captures<'_>| {
        if caps.name("block").is_some() {
            " "
        } else {
            ""
        }
    })
}
