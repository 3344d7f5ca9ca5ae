use unicode_width::UnicodeWidthChar;

/// Truncates a string to at most `max_width` terminal columns, appending
/// "..." if truncated. Wide characters (e.g., Japanese text) count as two.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}
