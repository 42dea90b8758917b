//! Folder monitoring core.
//!
//! The [`FolderMonitor`] owns the known-files set and the poll loop;
//! [`Outcome`] names the terminal state of every processed file and the
//! subfolder it lands in; [`SyncNudge`] is the hook that coaxes a sync
//! client into materializing remote changes before each listing.

pub mod folder;
pub mod nudge;
pub mod outcome;

pub use folder::FolderMonitor;
pub use nudge::{NoopNudge, OneDriveNudge, SyncNudge};
pub use outcome::Outcome;
