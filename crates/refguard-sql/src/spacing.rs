//! Delimiter spacing
//!
//! Whitespace tokenization would glue `(`, `)`, `{{` and `}}` onto the words
//! next to them (`from(select`, `{{ref(`). This pass pads them so each one
//! becomes its own token.

/// Pad parentheses on both sides, `{{` on its right and `}}` on its left
///
/// Padding is only inserted where the neighbouring character is not already
/// whitespace, so spacing already-spaced text returns it unchanged.
pub fn space_delimiters(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + sql.len() / 8);
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '(' | ')' => {
                pad_left(&mut out);
                out.push(c);
                pad_right(&mut out, chars.peek().copied());
            }
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push_str("{{");
                pad_right(&mut out, chars.peek().copied());
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                pad_left(&mut out);
                out.push_str("}}");
            }
            _ => out.push(c),
        }
    }

    out
}

fn pad_left(out: &mut String) {
    if out.chars().next_back().is_some_and(|c| !c.is_whitespace()) {
        out.push(' ');
    }
}

fn pad_right(out: &mut String, next: Option<char>) {
    if next.is_some_and(|c| !c.is_whitespace()) {
        out.push(' ');
    }
}
