//! Whisper transcription backend.
//!
//! Shells out to a local whisper binary and reads its JSON output. The
//! binary is resolved at construction so a missing install fails the
//! whole process at startup rather than per file.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::Transcriber;

const DEFAULT_WHISPER_PATH: &str = "/opt/homebrew/bin/whisper";

/// Whisper output JSON structure
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    text: String,
}

/// Transcriber backed by a local whisper binary.
#[derive(Debug)]
pub struct WhisperTranscriber {
    binary: PathBuf,
    model: String,
}

impl WhisperTranscriber {
    /// Resolve the whisper binary (WHISPER_PATH env or the default
    /// install location) and fail fast if it is not there.
    pub fn new(model: &str) -> Result<Self> {
        let binary = std::env::var("WHISPER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_WHISPER_PATH));

        if !binary.exists() {
            anyhow::bail!(
                "Whisper binary not found at {} (set WHISPER_PATH to override)",
                binary.display()
            );
        }

        tracing::info!(model, "Transcription engine ready: {}", binary.display());

        Ok(Self {
            binary,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        tracing::info!("Starting transcription of {}", audio_path.display());

        // Scratch dir for whisper's JSON output
        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;

        let output = Command::new(&self.binary)
            .arg(audio_path)
            .arg("--model")
            .arg(&self.model)
            .arg("--output_dir")
            .arg(temp_dir.path())
            .arg("--output_format")
            .arg("json")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to run whisper")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Whisper failed: {}", stderr.trim());
        }

        let stem = audio_path.file_stem().unwrap_or_default().to_string_lossy();
        let json_path = temp_dir.path().join(format!("{stem}.json"));

        let json_content = tokio::fs::read_to_string(&json_path)
            .await
            .context("Failed to read whisper output")?;

        let whisper: WhisperOutput =
            serde_json::from_str(&json_content).context("Failed to parse whisper JSON")?;

        let text = whisper.text.trim().to_string();
        if text.is_empty() {
            tracing::warn!("Transcription of {} is empty", audio_path.display());
        } else {
            tracing::info!("Transcription completed ({} chars)", text.len());
        }

        Ok(text)
    }
}
