//! bumblebee - folder-monitoring AI notification pipeline
//!
//! Watches a synchronized folder for new files, extracts their text
//! (plain read, docx paragraph join, or whisper transcription), augments
//! it with a YouTube transcript when the text embeds a video link, asks
//! a hosted model for an answer, emails the result, and relocates each
//! file into an outcome-tagged subfolder exactly once.
//!
//! # Modules
//!
//! - `monitor`: the core — known-files set, poll loop, per-file routine,
//!   outcome-based relocation
//! - `extract`: content extraction and YouTube link detection
//! - `adapters`: external collaborators (whisper, YouTube, x.ai, SMTP)
//! - `config`: YAML settings
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Monitor continuously
//! bumblebee watch
//!
//! # One poll cycle
//! bumblebee scan
//!
//! # Inspect resolved settings
//! bumblebee config
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod extract;
pub mod monitor;

// Re-export main types at crate root for convenience
pub use adapters::{Dispatcher, TranscriptFetcher, Transcriber};
pub use config::{EmailConfig, Settings};
pub use monitor::{FolderMonitor, NoopNudge, OneDriveNudge, Outcome, SyncNudge};
