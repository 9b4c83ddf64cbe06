//! Text helpers for card rendering

/// Truncates to `max_len` characters, ending in "..." when cut
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncate_at = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(truncate_at).collect();
        format!("{}...", truncated)
    }
}

/// Glyph suggesting the card's tilt
pub fn tilt_glyph(rotation_degrees: f32) -> &'static str {
    if rotation_degrees > 2.0 {
        "/"
    } else if rotation_degrees < -2.0 {
        "\\"
    } else {
        "|"
    }
}
