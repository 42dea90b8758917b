//! External collaborator boundaries.
//!
//! Each remote or process-external service the monitor talks to sits
//! behind an async trait so tests can substitute mocks:
//!
//! - [`Transcriber`]: audio → text (whisper)
//! - [`TranscriptFetcher`]: YouTube URL → transcript
//! - [`Dispatcher`]: query → AI answer → email notification
//!
//! Boundary errors surface as `Result::Err` and are converted to outcome
//! tags inside the monitor's per-file routine; nothing here panics on a
//! failed remote call.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

pub mod dispatch;
pub mod mailer;
pub mod whisper;
pub mod xai;
pub mod youtube;

pub use dispatch::AiEmailDispatcher;
pub use mailer::Mailer;
pub use whisper::WhisperTranscriber;
pub use xai::XaiClient;
pub use youtube::YouTubeTranscriptFetcher;

/// Speech-to-text boundary.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file to plain text.
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}

/// Video transcript retrieval boundary.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the transcript for a YouTube video URL.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// AI query + email notification boundary.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Send `query` to the hosted model and email the answer.
    async fn dispatch(
        &self,
        query: &str,
        api_key: &str,
        sender_email: &str,
        sender_password: &str,
        recipient_email: &str,
    ) -> Result<()>;
}
