//! Sync-refresh nudge.
//!
//! OneDrive's client only materializes remote changes locally when it sees
//! filesystem activity. Creating and deleting a throw-away subdirectory in
//! the monitored folder is enough to coax it into a sync pass before we
//! take a directory listing. Backends that sync on their own use
//! [`NoopNudge`].

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Hook invoked at the top of every poll cycle, before the listing.
///
/// Failures are logged by the caller and never abort the cycle.
#[async_trait]
pub trait SyncNudge: Send + Sync {
    async fn nudge(&self, dir: &Path) -> Result<()>;
}

/// Nudge tuned for the OneDrive sync client.
pub struct OneDriveNudge {
    /// How long to leave the marker directory in place so the sync client
    /// can observe it.
    pub settle_delay: Duration,
}

impl Default for OneDriveNudge {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(2),
        }
    }
}

#[async_trait]
impl SyncNudge for OneDriveNudge {
    async fn nudge(&self, dir: &Path) -> Result<()> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let marker = dir.join(format!("refresh_{stamp}"));

        tokio::fs::create_dir(&marker)
            .await
            .with_context(|| format!("Failed to create refresh marker {}", marker.display()))?;

        tokio::time::sleep(self.settle_delay).await;

        // Loosen permissions first so deletion survives restrictive ACLs.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = tokio::fs::set_permissions(&marker, std::fs::Permissions::from_mode(0o777))
                .await;
        }

        tokio::fs::remove_dir(&marker)
            .await
            .with_context(|| format!("Failed to remove refresh marker {}", marker.display()))?;

        Ok(())
    }
}

/// Nudge that does nothing, for storage backends that need no coaxing.
pub struct NoopNudge;

#[async_trait]
impl SyncNudge for NoopNudge {
    async fn nudge(&self, _dir: &Path) -> Result<()> {
        Ok(())
    }
}
