//! Sliding (previous, current, next) view over a token sequence

/// Three consecutive tokens around the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window<'a> {
    /// Token before `current`; absent at the first position
    pub previous: Option<&'a str>,

    pub current: &'a str,

    /// Token after `current`; absent at the last position
    pub next: Option<&'a str>,
}

impl Window<'_> {
    /// Whether `previous` equals one of `keywords`, ignoring ASCII case
    pub fn previous_is_any(&self, keywords: &[&str]) -> bool {
        self.previous
            .is_some_and(|prev| keywords.iter().any(|kw| prev.eq_ignore_ascii_case(kw)))
    }

    /// Whether `current` equals `keyword`, ignoring ASCII case
    pub fn current_is(&self, keyword: &str) -> bool {
        self.current.eq_ignore_ascii_case(keyword)
    }

    /// Whether `next` equals one of `keywords`, ignoring ASCII case
    pub fn next_is_any(&self, keywords: &[&str]) -> bool {
        self.next
            .is_some_and(|next| keywords.iter().any(|kw| next.eq_ignore_ascii_case(kw)))
    }
}

/// Lazy iterator over every [`Window`] of a token slice
///
/// Call [`windows`] again on the same slice to restart from the top.
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    tokens: &'a [&'a str],
    position: usize,
}

/// Walk `tokens` one window per token
pub fn windows<'a>(tokens: &'a [&'a str]) -> Windows<'a> {
    Windows {
        tokens,
        position: 0,
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = *self.tokens.get(self.position)?;
        let previous = self
            .position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .copied();
        let next = self.tokens.get(self.position + 1).copied();

        self.position += 1;
        Some(Window {
            previous,
            current,
            next,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tokens.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows<'_> {}

impl std::iter::FusedIterator for Windows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_has_no_windows() {
        assert_eq!(windows(&[]).count(), 0);
    }

    #[test]
    fn single_token_has_no_neighbours() {
        let tokens = ["orders"];
        let all: Vec<_> = windows(&tokens).collect();
        assert_eq!(
            all,
            vec![Window {
                previous: None,
                current: "orders",
                next: None
            }]
        );
    }

    #[test]
    fn windows_follow_document_order() {
        let tokens = ["select", "*", "from", "t"];
        let all: Vec<_> = windows(&tokens)
            .map(|w| (w.previous, w.current, w.next))
            .collect();

        assert_eq!(
            all,
            vec![
                (None, "select", Some("*")),
                (Some("select"), "*", Some("from")),
                (Some("*"), "from", Some("t")),
                (Some("from"), "t", None),
            ]
        );
    }

    #[test]
    fn reports_exact_length() {
        let tokens = ["a", "b", "c"];
        let mut iter = windows(&tokens);
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }

    #[test]
    fn keyword_checks_ignore_case() {
        let tokens = ["FROM", "Orders", "JOIN"];
        let window = windows(&tokens).nth(1).unwrap();

        assert!(window.previous_is_any(&["from", "join"]));
        assert!(window.current_is("orders"));
        assert!(window.next_is_any(&["join"]));
        assert!(!window.next_is_any(&["from"]));
    }
}
