//! YouTube URL classification

use regex::Regex;
use std::sync::OnceLock;

/// Validate that a string looks like a YouTube video or playlist URL
pub fn is_youtube_url(url: &str) -> bool {
    url.contains("youtube.com/watch")
        || url.contains("youtu.be/")
        || url.contains("youtube.com/playlist")
        || url.contains("youtube.com/shorts")
        || url.contains("music.youtube.com")
}

/// Check whether the URL carries a playlist marker
pub fn is_playlist_url(url: &str) -> bool {
    playlist_id_regex().is_match(url)
}

/// Extract the playlist ID from a URL, if present
pub fn extract_playlist_id(url: &str) -> Option<&str> {
    playlist_id_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn playlist_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[&?]list=([a-zA-Z0-9_-]+)").unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_youtube_url() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_youtube_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_youtube_url(
            "https://youtube.com/playlist?list=PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf"
        ));
        assert!(is_youtube_url("https://music.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_youtube_url("https://example.com/video"));
    }

    #[test]
    fn test_is_playlist_url() {
        assert!(is_playlist_url(
            "https://www.youtube.com/playlist?list=PLrAXtmRdnEQy6nuLMHjMZOz59Ys8KQJOx"
        ));
        assert!(is_playlist_url(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy6nuLMHjMZOz59Ys8KQJOx"
        ));
        assert!(!is_playlist_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_playlist_url("https://youtu.be/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_extract_playlist_id() {
        assert_eq!(
            extract_playlist_id(
                "https://www.youtube.com/playlist?list=PLrAXtmRdnEQy6nuLMHjMZOz59Ys8KQJOx"
            ),
            Some("PLrAXtmRdnEQy6nuLMHjMZOz59Ys8KQJOx")
        );
        assert_eq!(
            extract_playlist_id(
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123_abc-XYZ"
            ),
            Some("PL123_abc-XYZ")
        );
        assert_eq!(
            extract_playlist_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            None
        );
    }
}
