//! String helpers for log lines and console previews.

/// Truncate to at most `max_len` bytes, appending `...` when cut.
///
/// The cut point is moved back to the nearest UTF-8 character boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Collapse all whitespace runs (including newlines) into single spaces and
/// truncate, for one-line previews of multi-paragraph model output.
pub fn preview(s: &str, max_len: usize) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_is_unchanged() {
        assert_eq!(truncate("APPROVE", 20), "APPROVE");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("PROPOSAL DONE for 2025", 10), "PROPOSA...");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // "é" is two bytes; a cut in the middle must back off
        let s = "ééééé";
        let out = truncate(s, 6);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 6);
    }

    #[test]
    fn test_preview_collapses_whitespace() {
        assert_eq!(
            preview("Verdict:\n  Compliant\n\nReason: ok", 100),
            "Verdict: Compliant Reason: ok"
        );
    }
}
