//! YouTube URL parsing and validation.
//!
//! Accepted shapes:
//! - https://youtube.com/watch?v=VIDEO_ID
//! - https://youtu.be/VIDEO_ID
//! - https://youtube.com/embed/VIDEO_ID
//! - https://youtube.com/v/VIDEO_ID
//! - https://youtube.com/shorts/VIDEO_ID
//!
//! The scheme may be omitted. Query parameters and fragments are ignored.
//! URLs are untrusted input: only YouTube hosts are accepted and the video
//! id must be exactly 11 characters of `[A-Za-z0-9_-]`.

use thiserror::Error;
use url::Url;

/// Maximum URL length accepted before parsing.
pub const MAX_URL_LENGTH: usize = 2048;

/// Length of a YouTube video id.
pub const VIDEO_ID_LENGTH: usize = 11;

const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com"];
const SHORT_LINK_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];

/// Errors that can occur during YouTube URL validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YoutubeUrlError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("URL exceeds maximum length of {} characters", MAX_URL_LENGTH)]
    TooLong,

    #[error("URL is not a valid YouTube URL")]
    InvalidYoutubeUrl,

    #[error("Video ID has invalid format")]
    InvalidVideoId,

    #[error("Video ID not found in URL")]
    VideoIdNotFound,
}

pub type YoutubeUrlResult<T> = Result<T, YoutubeUrlError>;

/// A validated YouTube link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YoutubeUrl {
    /// The URL as submitted, trimmed.
    pub raw: String,
    /// The 11-character video id.
    pub video_id: String,
}

impl YoutubeUrl {
    /// Parse and validate a user-submitted URL.
    pub fn parse(input: &str) -> YoutubeUrlResult<Self> {
        let video_id = extract_youtube_id(input)?;
        Ok(Self {
            raw: input.trim().to_string(),
            video_id,
        })
    }

    /// Canonical watch URL for the video.
    pub fn canonical(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// Extract the YouTube video id from a URL.
pub fn extract_youtube_id(input: &str) -> YoutubeUrlResult<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(YoutubeUrlError::Empty);
    }
    if input.len() > MAX_URL_LENGTH {
        return Err(YoutubeUrlError::TooLong);
    }

    let url = parse_with_default_scheme(input)?;
    let host = url
        .host_str()
        .map(|h| h.to_ascii_lowercase())
        .ok_or(YoutubeUrlError::InvalidYoutubeUrl)?;

    let candidate = if SHORT_LINK_HOSTS.contains(&host.as_str()) {
        first_path_segment(&url)
    } else if YOUTUBE_HOSTS.contains(&host.as_str()) {
        extract_from_youtube_path(&url)
    } else {
        return Err(YoutubeUrlError::InvalidYoutubeUrl);
    };

    match candidate {
        Some(id) => validate_video_id(id),
        None => Err(YoutubeUrlError::VideoIdNotFound),
    }
}

/// Check whether a string is a YouTube URL with a well-formed video id.
pub fn is_valid_youtube_url(input: &str) -> bool {
    extract_youtube_id(input).is_ok()
}

fn parse_with_default_scheme(input: &str) -> YoutubeUrlResult<Url> {
    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let url = Url::parse(&with_scheme).map_err(|_| YoutubeUrlError::InvalidYoutubeUrl)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(YoutubeUrlError::InvalidYoutubeUrl),
    }
}

fn first_path_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Extract from youtube.com: `/watch?v=`, `/embed/`, `/v/`, `/shorts/`.
fn extract_from_youtube_path(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    match segments.next()? {
        "watch" => url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned()),
        "embed" | "v" | "shorts" => segments
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn is_valid_video_id_chars(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn validate_video_id(id: String) -> YoutubeUrlResult<String> {
    if id.len() != VIDEO_ID_LENGTH || !is_valid_video_id_chars(&id) {
        return Err(YoutubeUrlError::InvalidVideoId);
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_youtube_id_success_cases() {
        for url in [
            "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/v/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy4qtr",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=30",
            "https://youtu.be/dQw4w9WgXcQ#t=30",
            "youtu.be/dQw4w9WgXcQ",
            "http://YOUTUBE.COM/watch?v=dQw4w9WgXcQ",
            "  https://youtube.com/watch?v=dQw4w9WgXcQ  ",
        ] {
            assert_eq!(extract_youtube_id(url).unwrap(), "dQw4w9WgXcQ", "{}", url);
        }
    }

    #[test]
    fn test_extract_youtube_id_error_cases() {
        assert_eq!(extract_youtube_id(""), Err(YoutubeUrlError::Empty));
        assert_eq!(
            extract_youtube_id("not-a-video-link"),
            Err(YoutubeUrlError::InvalidYoutubeUrl)
        );
        assert_eq!(
            extract_youtube_id("https://vimeo.com/123"),
            Err(YoutubeUrlError::InvalidYoutubeUrl)
        );
        // Host spoofing
        assert_eq!(
            extract_youtube_id("https://youtube.com.evil.io/watch?v=dQw4w9WgXcQ"),
            Err(YoutubeUrlError::InvalidYoutubeUrl)
        );
        assert_eq!(
            extract_youtube_id("ftp://youtube.com/watch?v=dQw4w9WgXcQ"),
            Err(YoutubeUrlError::InvalidYoutubeUrl)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com"),
            Err(YoutubeUrlError::VideoIdNotFound)
        );
        assert_eq!(
            extract_youtube_id("https://youtu.be/"),
            Err(YoutubeUrlError::VideoIdNotFound)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com/playlist?list=PLrAXtmRdnEQy"),
            Err(YoutubeUrlError::VideoIdNotFound)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com/watch?v=abc123"),
            Err(YoutubeUrlError::InvalidVideoId)
        );
        assert_eq!(
            extract_youtube_id("https://youtu.be/abc123def456789"),
            Err(YoutubeUrlError::InvalidVideoId)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com/watch?v=abc123def!!"),
            Err(YoutubeUrlError::InvalidVideoId)
        );
        assert_eq!(
            extract_youtube_id("https://youtube.com/watch?v="),
            Err(YoutubeUrlError::InvalidVideoId)
        );
    }

    #[test]
    fn test_too_long_url_rejected() {
        let url = format!("https://youtube.com/watch?v=dQw4w9WgXcQ&x={}", "a".repeat(MAX_URL_LENGTH));
        assert_eq!(extract_youtube_id(&url), Err(YoutubeUrlError::TooLong));
    }

    #[test]
    fn test_youtube_url_parse() {
        let url = YoutubeUrl::parse(" https://youtu.be/dQw4w9WgXcQ ").unwrap();
        assert_eq!(url.raw, "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(url.video_id, "dQw4w9WgXcQ");
        assert_eq!(url.canonical(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert!(is_valid_youtube_url("https://youtube.com/shorts/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            YoutubeUrlError::InvalidYoutubeUrl.to_string(),
            "URL is not a valid YouTube URL"
        );
        assert_eq!(YoutubeUrlError::InvalidVideoId.to_string(), "Video ID has invalid format");
    }
}
