//! Settings for the folder monitor.
//!
//! Loaded once at startup from `~/bumblebee.yaml` (overridable with
//! `--config`). The monitor path is required; everything else falls back
//! to defaults. Email credentials and the AI key may be absent here —
//! their absence surfaces per file as the config-error outcome, not at
//! startup.
//!
//! ```yaml
//! onedrive:
//!   monitor_path: /Users/me/OneDrive/inbox
//!   processed_path: /Users/me/OneDrive/inbox/processed
//!   check_interval: 60
//! email:
//!   sender_email: me@gmail.com
//!   sender_password: app-password
//!   recipient_email: you@example.com
//! ai:
//!   x.ai: xai-KEY
//! transcription:
//!   model: small
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;
const DEFAULT_WHISPER_MODEL: &str = "small";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub onedrive: OneDriveSection,
    #[serde(default)]
    pub email: Option<EmailSection>,
    #[serde(default)]
    pub ai: Option<AiSection>,
    #[serde(default)]
    pub transcription: Option<TranscriptionSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneDriveSection {
    /// Folder to watch for new files (required)
    pub monitor_path: PathBuf,
    /// Root for outcome subfolders (default: monitor_path/processed)
    pub processed_path: Option<PathBuf>,
    /// Poll interval in seconds (default: 60)
    pub check_interval: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailSection {
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub recipient_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiSection {
    #[serde(rename = "x.ai")]
    pub xai: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptionSection {
    pub model: Option<String>,
}

/// Email credentials triple, any part of which may be missing.
#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub recipient_email: Option<String>,
}

/// Resolved settings with defaults applied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub monitor_path: PathBuf,
    pub processed_path: PathBuf,
    pub check_interval_secs: u64,
    pub email: EmailConfig,
    pub ai_key: Option<String>,
    pub whisper_model: String,
}

impl Settings {
    /// Default config file location: `~/bumblebee.yaml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join("bumblebee.yaml"))
    }

    /// Load settings from `path`, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse settings from YAML content and apply defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(Self::resolve(file))
    }

    fn resolve(file: ConfigFile) -> Self {
        let monitor_path = file.onedrive.monitor_path;
        let processed_path = file
            .onedrive
            .processed_path
            .unwrap_or_else(|| monitor_path.join("processed"));
        let check_interval_secs = file
            .onedrive
            .check_interval
            .unwrap_or(DEFAULT_CHECK_INTERVAL_SECS);

        let email = file
            .email
            .map(|e| EmailConfig {
                sender_email: e.sender_email,
                sender_password: e.sender_password,
                recipient_email: e.recipient_email,
            })
            .unwrap_or_default();

        let ai_key = file.ai.and_then(|a| a.xai);

        let whisper_model = file
            .transcription
            .and_then(|t| t.model)
            .unwrap_or_else(|| DEFAULT_WHISPER_MODEL.to_string());

        Self {
            monitor_path,
            processed_path,
            check_interval_secs,
            email,
            ai_key,
            whisper_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let yaml = r#"
onedrive:
  monitor_path: /data/inbox
  processed_path: /data/done
  check_interval: 15
email:
  sender_email: me@gmail.com
  sender_password: secret
  recipient_email: you@example.com
ai:
  x.ai: xai-key-123
transcription:
  model: medium
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.monitor_path, PathBuf::from("/data/inbox"));
        assert_eq!(settings.processed_path, PathBuf::from("/data/done"));
        assert_eq!(settings.check_interval_secs, 15);
        assert_eq!(settings.email.sender_email.as_deref(), Some("me@gmail.com"));
        assert_eq!(settings.ai_key.as_deref(), Some("xai-key-123"));
        assert_eq!(settings.whisper_model, "medium");
    }

    #[test]
    fn test_defaults_applied() {
        let yaml = r#"
onedrive:
  monitor_path: /data/inbox
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(
            settings.processed_path,
            PathBuf::from("/data/inbox/processed")
        );
        assert_eq!(settings.check_interval_secs, 60);
        assert!(settings.email.sender_email.is_none());
        assert!(settings.ai_key.is_none());
        assert_eq!(settings.whisper_model, "small");
    }

    #[test]
    fn test_missing_monitor_path_is_fatal() {
        let yaml = r#"
onedrive:
  check_interval: 30
"#;
        assert!(Settings::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_missing_onedrive_section_is_fatal() {
        assert!(Settings::from_yaml("email:\n  sender_email: a@b.c\n").is_err());
    }
}
