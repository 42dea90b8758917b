//! Content extraction: classify a file by extension and produce its text.
//!
//! Three supported routes: plain read for .txt, paragraph join for .docx,
//! and delegation to the transcription engine for .mp3. Legacy .doc is
//! recognized so it can be filed as unsupported rather than silently
//! ignored.

use std::path::Path;

use thiserror::Error;

use crate::adapters::Transcriber;

pub mod docx;
pub mod link;

/// Supported file kinds, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// .txt — read whole file as UTF-8.
    Text,
    /// .docx — paragraph texts joined with newlines.
    Docx,
    /// .mp3 — transcribed by the transcription engine.
    Audio,
    /// .doc — recognized but rejected as unsupported.
    LegacyDoc,
    /// Anything else.
    Unsupported,
}

impl FileKind {
    /// Classify a path by its (lowercased) extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("txt") => FileKind::Text,
            Some("docx") => FileKind::Docx,
            Some("mp3") => FileKind::Audio,
            Some("doc") => FileKind::LegacyDoc,
            _ => FileKind::Unsupported,
        }
    }

    /// True for extensions the monitor picks up at all.
    pub fn is_supported(&self) -> bool {
        !matches!(self, FileKind::Unsupported)
    }
}

/// Errors from content extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type")]
    Unsupported,

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Failed to parse document: {0}")]
    Docx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produce the raw text payload for a file.
///
/// Audio transcriptions come back unwrapped; the monitor applies the
/// summarization prompt after its empty-content check.
pub async fn extract(
    path: &Path,
    kind: FileKind,
    transcriber: &dyn Transcriber,
) -> Result<String, ExtractError> {
    match kind {
        FileKind::Text => Ok(tokio::fs::read_to_string(path).await?),
        FileKind::Docx => docx::extract_text(path),
        FileKind::Audio => transcriber
            .transcribe(path)
            .await
            .map_err(|e| ExtractError::Transcription(e.to_string())),
        FileKind::LegacyDoc | FileKind::Unsupported => Err(ExtractError::Unsupported),
    }
}
