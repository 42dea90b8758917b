//! YouTube transcript fetcher.
//!
//! Pulls the caption track URL out of the watch page and downloads the
//! timedtext XML. Distinguishes "captions disabled" from "no transcript
//! available" in the error message; the monitor files both under the
//! same outcome.

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::TranscriptFetcher;
use crate::extract::link;

static CAPTION_TRACK_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""captionTracks":\s*\[\{"baseUrl":"([^"]+)""#).expect("valid caption pattern")
});

static TIMEDTEXT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("valid timedtext pattern"));

/// Transcript fetcher backed by YouTube's public watch page.
pub struct YouTubeTranscriptFetcher {
    client: reqwest::Client,
}

impl Default for YouTubeTranscriptFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl YouTubeTranscriptFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TranscriptFetcher for YouTubeTranscriptFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let video_id = link::video_id(url)
            .with_context(|| format!("Could not extract a video id from {url}"))?;

        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        let page = self
            .client
            .get(&watch_url)
            .send()
            .await
            .context("Failed to fetch YouTube watch page")?
            .text()
            .await
            .context("Failed to read YouTube watch page")?;

        if !page.contains("captionTracks") {
            anyhow::bail!("Transcripts are disabled for video {video_id}");
        }

        let caption_url = CAPTION_TRACK_URL
            .captures(&page)
            .and_then(|c| c.get(1))
            .map(|m| unescape_json_url(m.as_str()))
            .with_context(|| format!("No transcript available for video {video_id}"))?;

        let timedtext = self
            .client
            .get(&caption_url)
            .send()
            .await
            .context("Failed to fetch caption track")?
            .text()
            .await
            .context("Failed to read caption track")?;

        let transcript = parse_timedtext(&timedtext);
        if transcript.is_empty() {
            anyhow::bail!("No transcript available for video {video_id}");
        }

        tracing::info!(video_id, "Transcript fetched ({} chars)", transcript.len());

        Ok(transcript)
    }
}

/// Caption URLs arrive JSON-escaped inside the page source.
fn unescape_json_url(url: &str) -> String {
    url.replace("\\u0026", "&").replace("\\/", "/")
}

/// Join timedtext cue texts into one plain-text transcript.
fn parse_timedtext(xml: &str) -> String {
    let cues: Vec<String> = TIMEDTEXT_LINE
        .captures_iter(xml)
        .filter_map(|c| c.get(1))
        .map(|m| decode_entities(m.as_str()))
        .filter(|t| !t.trim().is_empty())
        .collect();

    cues.join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace('\n', " ")
}
