//! Free-text cleanup for titles and abstracts

/// Collapse every whitespace run, newlines included, into a single space and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_runs() {
        assert_eq!(normalize_whitespace("  hello  world  "), "hello world");
        assert_eq!(normalize_whitespace("hello\n\nworld"), "hello world");
        assert_eq!(normalize_whitespace("a\t b \r\n c"), "a b c");
    }

    #[test]
    fn test_idempotent() {
        for input in ["", "   ", "one", "  Deep\n  Learning  for\tGraphs "] {
            let once = normalize_whitespace(input);
            assert_eq!(normalize_whitespace(&once), once);
        }
    }
}
