//! YouTube link detection and transcript prompt augmentation.
//!
//! Matches both the canonical watch URL and the short-link form, capturing
//! the video id plus any trailing query parameters. Substrings that merely
//! look like a URL without the YouTube host do not match.

use once_cell::sync::Lazy;
use regex::Regex;

static YOUTUBE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)[\w\-=&?]+")
        .expect("valid YouTube URL pattern")
});

/// Find the first YouTube video URL embedded in `text`.
pub fn find_video_url(text: &str) -> Option<&str> {
    YOUTUBE_URL.find(text).map(|m| m.as_str())
}

/// Extract the video id from a matched YouTube URL.
pub fn video_id(url: &str) -> Option<&str> {
    let rest = if let Some(rest) = url.split_once("watch?v=").map(|(_, r)| r) {
        rest
    } else {
        url.split_once("youtu.be/").map(|(_, r)| r)?
    };

    let id = rest.split(|c| c == '&' || c == '?').next()?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Build the transcript-augmented query sent to the AI in place of the
/// original file content.
pub fn transcript_prompt(url: &str, transcript: &str) -> String {
    format!(
        "first provide a video summary, then provide detailed description for each topic \
         in this video with precision including key points made and person who made the point. \
         youtube video location: {url} The transcript: {transcript}"
    )
}
