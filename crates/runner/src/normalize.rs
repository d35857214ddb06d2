//! Expected/actual comparison rules.
//!
//! Comparison is exact string equality after normalization, with one
//! widening: when both sides parse as JSON, structural equality wins, so
//! `[1, 2]` and `[1,2]` compare equal.  No numeric tolerance is applied.

/// Trim surrounding whitespace and drop trailing commas.  Idempotent.
pub fn normalize(s: &str) -> String {
    let mut out = s.trim();
    while let Some(stripped) = out.strip_suffix(',') {
        out = stripped.trim_end();
    }
    out.to_string()
}

/// Whether an actual output satisfies the expected output.
pub fn outputs_match(expected: &str, actual: &str) -> bool {
    let expected = normalize(expected);
    let actual = normalize(actual);
    if expected == actual {
        return true;
    }
    match (
        serde_json::from_str::<serde_json::Value>(&expected),
        serde_json::from_str::<serde_json::Value>(&actual),
    ) {
        (Ok(e), Ok(a)) => e == a,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        for s in ["  [1,2] ", "x,", "a,,", "", "  "] {
            assert_eq!(normalize(s), normalize(&normalize(s)));
        }
    }

    #[test]
    fn trailing_commas_dropped() {
        assert_eq!(normalize("[1,2],"), "[1,2]");
        assert_eq!(normalize("x, ,"), "x");
    }

    #[test]
    fn json_structural_equality() {
        assert!(outputs_match("[1, 2]", "[1,2]"));
        assert!(outputs_match("{\"a\": 1}", "{\"a\":1}"));
        assert!(outputs_match(" [0,1] ", "[0,1]"));
    }

    #[test]
    fn no_numeric_tolerance() {
        assert!(!outputs_match("1.0", "1"));
        assert!(!outputs_match("[1]", "[2]"));
    }

    #[test]
    fn plain_strings_compare_exactly() {
        assert!(outputs_match("true", "true"));
        assert!(!outputs_match("abc", "abd"));
    }
}
