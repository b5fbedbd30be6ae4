//! Changelog summary extraction.

/// First human-authored line of a changelog
///
/// Returns the first line that is non-empty after trimming and does not
/// start with `#` (headings). Returns an empty string when no such line
/// exists.
///
/// ```
/// use shopgrade_core::changelog::extract_summary;
///
/// assert_eq!(extract_summary("# Changelog\n\nFixed bug\n"), "Fixed bug");
/// assert_eq!(extract_summary("## 1.0.0\n"), "");
/// ```
pub fn extract_summary(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_headings_and_blank_lines() {
        let text = "# Changelog\n\n## 1.1.0\n\n  - Fixed focus ring  \n- Other\n";
        assert_eq!(extract_summary(text), "- Fixed focus ring");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_summary(""), "");
        assert_eq!(extract_summary("\n\n   \n"), "");
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(extract_summary("# Title\r\n\r\nWindows line\r\n"), "Windows line");
    }

    #[test]
    fn test_indented_heading_is_still_a_heading() {
        assert_eq!(extract_summary("   ### Added\nBody"), "Body");
    }
}
