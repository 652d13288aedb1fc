//! Filesystem-safe naming for downloaded files

/// Longest sanitized name we produce, in characters.
const MAX_NAME_CHARS: usize = 100;

/// Sanitize a video or playlist title for use as a file or directory name.
///
/// Policy: `< > : " / \ | ? *` and control characters become `_`, surrounding
/// whitespace is trimmed, names are capped at 100 characters, and an empty
/// result falls back to `"Unknown"`.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect();

    let trimmed: String = sanitized.trim().chars().take(MAX_NAME_CHARS).collect();

    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Normal Title"), "Normal Title");
        assert_eq!(
            sanitize_filename("Title/With:Special*Chars"),
            "Title_With_Special_Chars"
        );
        assert_eq!(sanitize_filename("  Spaces  "), "Spaces");
    }

    #[test]
    fn test_sanitize_control_chars() {
        assert_eq!(sanitize_filename("a\tb\nc"), "a_b_c");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename(""), "Unknown");
        assert_eq!(sanitize_filename("   "), "Unknown");
    }

    #[test]
    fn test_sanitize_caps_length_at_char_boundary() {
        let long = "ü".repeat(400);
        let sanitized = sanitize_filename(&long);
        assert_eq!(sanitized.chars().count(), 100);
    }

    #[test]
    fn test_distinct_titles_stay_distinct() {
        // Reasonable distinct titles must not collide after sanitization.
        let titles = ["Track 1", "Track 2", "Track: 1", "Track_ 1"];
        let sanitized: Vec<_> = titles.iter().map(|t| sanitize_filename(t)).collect();
        assert_eq!(sanitized[0], "Track 1");
        assert_ne!(sanitized[0], sanitized[1]);
        // Colon maps to underscore, so "Track: 1" collides with "Track_ 1"
        // but not with the plain titles.
        assert_eq!(sanitized[2], sanitized[3]);
        assert_ne!(sanitized[2], sanitized[0]);
    }
}
