//! Command-line interface for bumblebee.
//!
//! `watch` runs the monitor until interrupted, `scan` does a single
//! poll cycle, `config` prints the resolved settings.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::monitor::FolderMonitor;

/// bumblebee - folder-monitoring AI notification pipeline
#[derive(Parser, Debug)]
#[command(name = "bumblebee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/bumblebee.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Monitor the folder continuously until interrupted
    Watch,

    /// Run a single poll cycle and exit
    Scan,

    /// Show resolved configuration
    Config,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load(self.config.as_deref())?;

        match self.command {
            Commands::Watch => {
                let mut monitor = FolderMonitor::new(&settings).await?;
                let processed = monitor.watch().await?;
                println!("Processed {} file(s).", processed.len());
                Ok(())
            }
            Commands::Scan => {
                let mut monitor = FolderMonitor::new(&settings).await?;
                let processed = monitor.scan_once().await?;
                if processed.is_empty() {
                    println!("No new files.");
                } else {
                    for path in &processed {
                        println!("processed: {}", path.display());
                    }
                }
                Ok(())
            }
            Commands::Config => {
                print_settings(&settings);
                Ok(())
            }
        }
    }
}

fn print_settings(settings: &Settings) {
    println!("monitor_path:    {}", settings.monitor_path.display());
    println!("processed_path:  {}", settings.processed_path.display());
    println!("check_interval:  {}s", settings.check_interval_secs);
    println!(
        "sender_email:    {}",
        settings.email.sender_email.as_deref().unwrap_or("(unset)")
    );
    println!(
        "sender_password: {}",
        if settings.email.sender_password.is_some() {
            "(set)"
        } else {
            "(unset)"
        }
    );
    println!(
        "recipient_email: {}",
        settings
            .email
            .recipient_email
            .as_deref()
            .unwrap_or("(unset)")
    );
    println!(
        "ai_key:          {}",
        if settings.ai_key.is_some() {
            "(set)"
        } else {
            "(unset)"
        }
    );
    println!("whisper_model:   {}", settings.whisper_model);
}
