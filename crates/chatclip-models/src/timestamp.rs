//! Compact timestamp helpers for VOD ranges.

/// True when `s` is a compact `HHMMSS` timestamp (exactly six digits).
pub fn is_valid_compact_time(s: &str) -> bool {
    s.len() == 6 && s.chars().all(|c| c.is_ascii_digit())
}

/// Format a compact `HHMMSS` timestamp as `HH:MM:SS`.
pub fn format_compact_time(s: &str) -> Option<String> {
    if !is_valid_compact_time(s) {
        return None;
    }
    Some(format!("{}:{}:{}", &s[..2], &s[2..4], &s[4..6]))
}

/// Normalize a user-supplied timestamp to `HH:MM:SS`.
///
/// Accepts compact `HHMMSS` or already-delimited `HH:MM:SS`. Returns
/// `None` for anything else.
pub fn normalize_time(s: &str) -> Option<String> {
    if is_valid_compact_time(s) {
        return format_compact_time(s);
    }
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() == 3
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_digit()))
    {
        return Some(s.to_string());
    }
    None
}
