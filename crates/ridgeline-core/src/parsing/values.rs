/// Parse a numeric token from a report.
///
/// Handles formats like:
/// - "68" -> 68.0
/// - "1,234.5" -> 1234.5 (thousands separators)
/// - "18%" -> 18.0 (trailing percent sign)
/// - "" or "n/a" -> None
///
/// A token that does not convert is absent, never an error.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim().trim_end_matches('%');
    if s.is_empty() {
        return None;
    }
    let normalized = strip_thousands(s);
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            tracing::debug!(token = s, "skipping non-numeric token");
            None
        }
    }
}

/// Parse a whole, non-negative number such as a count or a percent column.
pub fn parse_count(s: &str) -> Option<u32> {
    let s = s.trim().trim_end_matches('%');
    strip_thousands(s).parse::<u32>().ok()
}

/// Remove thousands separators ("12,345" -> "12345").
pub fn strip_thousands(s: &str) -> String {
    s.replace(',', "")
}

/// Truncate a value at the next large whitespace gap (3+ spaces).
///
/// `pdftotext -layout` places neighbouring columns on the same line, so a
/// label's value ends where the next column begins.
pub fn truncate_at_gap(s: &str) -> &str {
    let trimmed = s.trim();
    match trimmed.find("   ") {
        Some(gap_pos) => trimmed[..gap_pos].trim(),
        None => trimmed,
    }
}
