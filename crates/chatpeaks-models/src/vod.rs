//! VOD identifier extraction from viewer-facing URLs.

use thiserror::Error;
use url::Url;

/// Errors that can occur during VOD id extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VodIdError {
    #[error("URL is not a valid VOD URL")]
    InvalidVodUrl,

    #[error("Video ID has invalid format")]
    InvalidVideoId,

    #[error("Video ID not found in URL")]
    VideoIdNotFound,
}

/// Result type for VOD id extraction.
pub type VodIdResult<T> = Result<T, VodIdError>;

/// Extract the numeric VOD id from a video URL.
///
/// Accepts the replay URL formats viewers paste in:
/// - https://www.twitch.tv/videos/123456789
/// - https://twitch.tv/videos/123456789?t=1h2m3s
/// - https://m.twitch.tv/videos/123456789
///
/// Returns the digits after `/videos/` or an error.
pub fn extract_vod_id(input: &str) -> VodIdResult<String> {
    let input = input.trim();

    let parsed = Url::parse(input).map_err(|_| VodIdError::InvalidVodUrl)?;
    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(VodIdError::InvalidVodUrl),
    }
    if parsed.host_str().is_none() {
        return Err(VodIdError::InvalidVodUrl);
    }

    let path = parsed.path();
    let Some(rest) = path.split("/videos/").nth(1) else {
        return Err(VodIdError::VideoIdNotFound);
    };

    let id: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if id.is_empty() {
        return Err(VodIdError::VideoIdNotFound);
    }

    // The id segment must be purely numeric up to the next path separator.
    let segment_end = rest.find('/').unwrap_or(rest.len());
    if id.len() != segment_end {
        return Err(VodIdError::InvalidVideoId);
    }

    Ok(id)
}

/// Check that a bare id is a plausible VOD id (non-empty, all digits).
pub fn is_valid_vod_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 20 && id.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_vod_id_success_cases() {
        assert_eq!(
            extract_vod_id("https://www.twitch.tv/videos/123456789").unwrap(),
            "123456789"
        );
        assert_eq!(
            extract_vod_id("https://twitch.tv/videos/42").unwrap(),
            "42"
        );
        // Query parameters and fragments after the id
        assert_eq!(
            extract_vod_id("https://www.twitch.tv/videos/987654321?t=1h2m3s").unwrap(),
            "987654321"
        );
        // Mobile host
        assert_eq!(
            extract_vod_id("https://m.twitch.tv/videos/555000111").unwrap(),
            "555000111"
        );
        // Trailing path segment after the id
        assert_eq!(
            extract_vod_id("https://www.twitch.tv/videos/123456789/").unwrap(),
            "123456789"
        );
        // Surrounding whitespace is trimmed
        assert_eq!(
            extract_vod_id("  https://www.twitch.tv/videos/123456789  ").unwrap(),
            "123456789"
        );
    }

    #[test]
    fn test_extract_vod_id_error_cases() {
        // Not a URL at all
        assert_eq!(extract_vod_id("123456789"), Err(VodIdError::InvalidVodUrl));
        assert_eq!(extract_vod_id(""), Err(VodIdError::InvalidVodUrl));

        // Unsupported scheme
        assert_eq!(
            extract_vod_id("ftp://twitch.tv/videos/123"),
            Err(VodIdError::InvalidVodUrl)
        );

        // No /videos/ segment
        assert_eq!(
            extract_vod_id("https://www.twitch.tv/somestreamer"),
            Err(VodIdError::VideoIdNotFound)
        );

        // Empty id
        assert_eq!(
            extract_vod_id("https://www.twitch.tv/videos/"),
            Err(VodIdError::VideoIdNotFound)
        );

        // Non-numeric id segment
        assert_eq!(
            extract_vod_id("https://www.twitch.tv/videos/abc123"),
            Err(VodIdError::VideoIdNotFound)
        );
        assert_eq!(
            extract_vod_id("https://www.twitch.tv/videos/123abc"),
            Err(VodIdError::InvalidVideoId)
        );
    }

    #[test]
    fn test_is_valid_vod_id() {
        assert!(is_valid_vod_id("123456789"));
        assert!(is_valid_vod_id("1"));
        assert!(!is_valid_vod_id(""));
        assert!(!is_valid_vod_id("12a34"));
        assert!(!is_valid_vod_id("123456789012345678901"));
    }
}
