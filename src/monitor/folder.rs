//! Folder monitor: the per-file processing pipeline.
//!
//! Owns the known-files set and drives the poll cycle: nudge the sync
//! client, list the folder, diff against known files, run each new
//! supported file through extraction → optional transcript augmentation
//! → AI dispatch, then relocate it into an outcome subfolder. One file
//! at a time, one cycle at a time; a failure in any step files the file
//! under its error folder and the loop moves on.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::adapters::{
    AiEmailDispatcher, Dispatcher, TranscriptFetcher, Transcriber, WhisperTranscriber,
    YouTubeTranscriptFetcher,
};
use crate::config::{EmailConfig, Settings};
use crate::extract::{self, link, ExtractError, FileKind};

use super::nudge::{OneDriveNudge, SyncNudge};
use super::outcome::Outcome;

/// Relocation gives up after this many collision-suffix attempts.
const MAX_RENAME_ATTEMPTS: u32 = 100;

const AUDIO_PROMPT_PREFIX: &str = "Summarize the following audio transcription: \n\n";

/// Watches a folder and processes new arrivals exactly once.
pub struct FolderMonitor {
    monitor_path: PathBuf,
    processed_path: PathBuf,
    check_interval: Duration,
    email: EmailConfig,
    ai_key: Option<String>,

    /// Paths already accounted for: pre-existing at startup or already
    /// relocated. Membership means "never process this path".
    known_files: HashSet<PathBuf>,

    transcriber: Box<dyn Transcriber>,
    fetcher: Box<dyn TranscriptFetcher>,
    dispatcher: Box<dyn Dispatcher>,
    nudge: Box<dyn SyncNudge>,
}

impl FolderMonitor {
    /// Production wiring: whisper, YouTube fetcher, x.ai + SMTP
    /// dispatcher, OneDrive nudge.
    ///
    /// Fails if the transcription engine cannot initialize.
    pub async fn new(settings: &Settings) -> Result<Self> {
        let transcriber = WhisperTranscriber::new(&settings.whisper_model)
            .context("Failed to initialize transcription engine")?;

        Self::with_collaborators(
            settings,
            Box::new(transcriber),
            Box::new(YouTubeTranscriptFetcher::new()),
            Box::new(AiEmailDispatcher::new()),
            Box::new(OneDriveNudge::default()),
        )
        .await
    }

    /// Construct with explicit collaborators (tests inject mocks here).
    ///
    /// Creates the processed root and seeds the known-files set from one
    /// baseline listing, so files present before monitoring began are
    /// never processed.
    pub async fn with_collaborators(
        settings: &Settings,
        transcriber: Box<dyn Transcriber>,
        fetcher: Box<dyn TranscriptFetcher>,
        dispatcher: Box<dyn Dispatcher>,
        nudge: Box<dyn SyncNudge>,
    ) -> Result<Self> {
        tokio::fs::create_dir_all(&settings.processed_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to create processed folder {}",
                    settings.processed_path.display()
                )
            })?;

        let mut monitor = Self {
            monitor_path: settings.monitor_path.clone(),
            processed_path: settings.processed_path.clone(),
            check_interval: Duration::from_secs(settings.check_interval_secs),
            email: settings.email.clone(),
            ai_key: settings.ai_key.clone(),
            known_files: HashSet::new(),
            transcriber,
            fetcher,
            dispatcher,
            nudge,
        };

        monitor.scan_existing_files().await?;

        Ok(monitor)
    }

    /// Baseline scan: everything already in the folder is known.
    async fn scan_existing_files(&mut self) -> Result<()> {
        match self.list_files().await {
            Ok(files) => {
                info!(
                    "Initial scan complete. Found {} existing files.",
                    files.len()
                );
                self.known_files = files;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Monitor directory {} not found. Creating it.",
                    self.monitor_path.display()
                );
                tokio::fs::create_dir_all(&self.monitor_path)
                    .await
                    .context("Failed to create monitor directory")?;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                warn!(
                    "Permission denied when accessing {}",
                    self.monitor_path.display()
                );
                Ok(())
            }
            Err(e) => Err(e).context("Failed to scan monitor directory"),
        }
    }

    /// List regular files directly inside the monitor folder.
    async fn list_files(&self) -> std::io::Result<HashSet<PathBuf>> {
        let mut files = HashSet::new();
        let mut entries = tokio::fs::read_dir(&self.monitor_path).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            match entry.metadata().await {
                Ok(meta) if meta.is_file() => {
                    files.insert(path);
                }
                _ => {}
            }
        }

        Ok(files)
    }

    /// Monitor continuously until ctrl-c; returns everything processed
    /// successfully before the interrupt.
    pub async fn watch(&mut self) -> Result<Vec<PathBuf>> {
        info!("Starting to monitor folder: {}", self.monitor_path.display());
        info!(
            "Processed files will be moved to: {}",
            self.processed_path.display()
        );

        let mut processed = Vec::new();

        loop {
            let cycle = self.poll_once().await?;
            processed.extend(cycle);

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Monitoring stopped by user.");
                    return Ok(processed);
                }
                _ = tokio::time::sleep(self.check_interval) => {}
            }
        }
    }

    /// Single-pass mode: one poll cycle, then return the successes.
    pub async fn scan_once(&mut self) -> Result<Vec<PathBuf>> {
        self.poll_once().await
    }

    /// One poll cycle: nudge, list, diff, process. Returns the paths
    /// processed successfully this cycle.
    pub async fn poll_once(&mut self) -> Result<Vec<PathBuf>> {
        if let Err(e) = self.nudge.nudge(&self.monitor_path).await {
            warn!("Could not refresh sync folder: {e:#}");
        }

        let current_files = self
            .list_files()
            .await
            .context("Failed to list monitor directory")?;

        let mut candidates: Vec<PathBuf> = current_files
            .difference(&self.known_files)
            .filter(|p| FileKind::from_path(p).is_supported())
            .cloned()
            .collect();
        // Directory listings have no stable order; sort so processing
        // order is deterministic.
        candidates.sort();

        let mut processed: Vec<PathBuf> = Vec::new();

        for path in candidates {
            let outcome = self.process_file(&path).await;
            if outcome.is_success() {
                processed.push(path);
                // Anything else still sitting in the folder stays
                // eligible as "new" on later cycles; successes are never
                // re-seen even if listings reorder.
                let accumulated: HashSet<PathBuf> = processed.iter().cloned().collect();
                self.known_files = current_files
                    .difference(&accumulated)
                    .cloned()
                    .collect();
            }
        }

        Ok(processed)
    }

    /// Per-file routine: always terminates in an outcome and a
    /// relocation attempt. Unexpected errors map to the critical-error
    /// outcome; the file is never left untracked.
    async fn process_file(&mut self, path: &Path) -> Outcome {
        let filename = file_name_of(path);
        info!("Processing new file: {filename}");

        let outcome = match self.handle_file(path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Critical error processing file {}: {e:#}", path.display());
                Outcome::CriticalError
            }
        };

        self.relocate(path, &filename, outcome).await;

        outcome
    }

    /// The classification / extraction / augmentation / dispatch chain.
    ///
    /// Collaborator failures are converted to outcome tags right here at
    /// the boundary; only genuinely unexpected errors propagate as `Err`.
    async fn handle_file(&self, path: &Path) -> Result<Outcome> {
        let kind = FileKind::from_path(path);

        if matches!(kind, FileKind::LegacyDoc | FileKind::Unsupported) {
            info!("Unsupported file type for {}", path.display());
            return Ok(Outcome::Unsupported);
        }

        let text = match extract::extract(path, kind, self.transcriber.as_ref()).await {
            Ok(text) => text,
            Err(ExtractError::Transcription(msg)) => {
                warn!("Transcription failed for {}: {msg}", path.display());
                return Ok(Outcome::ErrorTranscription);
            }
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            info!("No content to process for {}", path.display());
            return Ok(Outcome::EmptyContent);
        }

        let mut query = match kind {
            FileKind::Audio => format!("{AUDIO_PROMPT_PREFIX}{text}"),
            _ => text,
        };

        if let Some(url) = link::find_video_url(&query).map(str::to_string) {
            info!("Detected YouTube URL in {}: {url}", path.display());

            if self.ai_key.is_none() {
                warn!("AI API key not configured for YouTube processing");
                return Ok(Outcome::ErrorConfig);
            }

            match self.fetcher.fetch(&url).await {
                Ok(transcript) => {
                    debug!("Transcript fetched for {url}");
                    query = link::transcript_prompt(&url, &transcript);
                }
                Err(e) => {
                    warn!("Error fetching transcript for {url}: {e:#}");
                    return Ok(Outcome::ErrorYoutubeTranscript);
                }
            }
        }

        let (sender, password, recipient, api_key) = match (
            self.email.sender_email.as_deref(),
            self.email.sender_password.as_deref(),
            self.email.recipient_email.as_deref(),
            self.ai_key.as_deref(),
        ) {
            (Some(s), Some(p), Some(r), Some(k)) => (s, p, r, k),
            _ => {
                warn!("Email or AI API key configuration is missing");
                return Ok(Outcome::ErrorConfig);
            }
        };

        match self
            .dispatcher
            .dispatch(&query, api_key, sender, password, recipient)
            .await
        {
            Ok(()) => {
                info!("Successfully processed {} and sent email.", path.display());
                Ok(Outcome::Processed)
            }
            Err(e) => {
                warn!("AI/email step failed for {}: {e:#}", path.display());
                Ok(Outcome::ErrorAiEmail)
            }
        }
    }

    /// Move a file into its outcome subfolder. Failures are logged, not
    /// propagated; the known-files set only forgets the path after a
    /// successful move.
    async fn relocate(&mut self, path: &Path, filename: &str, outcome: Outcome) {
        if let Err(e) = self.try_relocate(path, filename, outcome).await {
            error!(
                "Error moving file {filename} to {}: {e:#}",
                outcome.folder_name()
            );
        }
    }

    async fn try_relocate(&mut self, path: &Path, filename: &str, outcome: Outcome) -> Result<()> {
        let dest_dir = self.processed_path.join(outcome.folder_name());
        tokio::fs::create_dir_all(&dest_dir)
            .await
            .with_context(|| format!("Failed to create {}", dest_dir.display()))?;

        let destination = next_free_name(&dest_dir, filename).await?;

        move_file(path, &destination).await?;
        info!("Moved {filename} to {}", destination.display());

        self.known_files.remove(path);

        Ok(())
    }
}

/// Pick the first non-colliding destination name, suffixing `_1`, `_2`,
/// … before the extension. Gives up after a bounded number of attempts.
async fn next_free_name(dest_dir: &Path, filename: &str) -> Result<PathBuf> {
    let mut destination = dest_dir.join(filename);
    let (stem, ext) = split_name(filename);

    let mut counter: u32 = 1;
    while tokio::fs::try_exists(&destination).await? {
        if counter > MAX_RENAME_ATTEMPTS {
            anyhow::bail!(
                "Too many conflicting filenames for {filename} in {}",
                dest_dir.display()
            );
        }
        destination = dest_dir.join(format!("{stem}_{counter}{ext}"));
        counter += 1;
    }

    Ok(destination)
}

/// Split "name.ext" into ("name", ".ext"); extensionless names keep an
/// empty suffix.
fn split_name(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => (&filename[..idx], &filename[idx..]),
        _ => (filename, ""),
    }
}

/// Rename, falling back to copy+delete across filesystems.
async fn move_file(from: &Path, to: &Path) -> Result<()> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(_) => {
            tokio::fs::copy(from, to)
                .await
                .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
            tokio::fs::remove_file(from)
                .await
                .with_context(|| format!("Failed to remove {}", from.display()))?;
            Ok(())
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
