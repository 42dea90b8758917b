//! Per-file processing outcomes.
//!
//! Every file that enters the per-file routine terminates in exactly one
//! outcome, and the outcome tag doubles as the destination subfolder name
//! under the processed root. Operators triage failures by folder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How processing of a single file ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Content extracted, AI queried, notification sent.
    Processed,

    /// Extension outside the supported set (includes legacy .doc).
    Unsupported,

    /// Extracted content was empty or whitespace-only.
    EmptyContent,

    /// The transcription engine reported a failure.
    ErrorTranscription,

    /// Email credentials or AI key missing from configuration.
    ErrorConfig,

    /// A YouTube link was detected but its transcript could not be fetched.
    ErrorYoutubeTranscript,

    /// The AI query or the email send failed.
    ErrorAiEmail,

    /// Unexpected failure anywhere in the per-file routine.
    CriticalError,
}

impl Outcome {
    /// Destination subfolder name under the processed root.
    pub fn folder_name(&self) -> &'static str {
        match self {
            Outcome::Processed => "processed",
            Outcome::Unsupported => "unsupported",
            Outcome::EmptyContent => "empty_content",
            Outcome::ErrorTranscription => "error_transcription",
            Outcome::ErrorConfig => "error_config",
            Outcome::ErrorYoutubeTranscript => "error_youtube_transcript",
            Outcome::ErrorAiEmail => "error_ai_email",
            Outcome::CriticalError => "critical_error",
        }
    }

    /// True only for the success outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Processed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}
