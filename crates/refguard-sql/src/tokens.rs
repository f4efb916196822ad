//! Whitespace tokenizer

/// Split cleaned SQL on runs of whitespace, keeping document order
///
/// Tokens borrow from `sql` and keep their original case.
pub fn tokenize(sql: &str) -> Vec<&str> {
    sql.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_mixed_whitespace() {
        assert_eq!(
            tokenize("SELECT *\r\n\tFROM  orders\n"),
            vec!["SELECT", "*", "FROM", "orders"]
        );
    }

    #[test]
    fn no_empty_tokens_at_edges() {
        assert_eq!(tokenize("  \n a \n "), vec!["a"]);
        assert!(tokenize(" \t\n").is_empty());
    }
}
