//! Utility functions for Zero services.

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// This function safely handles multi-byte UTF-8 characters (emoji, CJK, accented characters)
/// by using character boundaries instead of byte indices.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let truncated = &s[..idx];
            format!("{}...", truncated.trim_end())
        }
        None => s.to_string(),
    }
}

/// Round a float to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_with_ellipsis("hello world", 5), "hello...");
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_with_ellipsis("héllo wörld", 4), "héll...");
        assert_eq!(truncate_with_ellipsis("📈📉📈", 2), "📈📉...");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(80.0049, 2), 80.0);
        assert_eq!(round_to(-0.70051, 3), -0.701);
        assert_eq!(round_to(42.5, 0), 43.0);
    }
}
