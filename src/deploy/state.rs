// ABOUTME: Deployment state types for the type state pattern.
// ABOUTME: Each state carries the artifacts produced so far, so later steps cannot run early.

use std::path::{Path, PathBuf};

/// Inputs checked, server untouched.
/// Available actions: `stop_server()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Validated;

/// Server stopped.
/// Available actions: `backup_webapps()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopped;

/// Snapshot of webapps/ written and synced.
/// Available actions: `copy_archive()`
#[derive(Debug, Clone)]
pub struct BackedUp {
    pub(crate) backup: PathBuf,
}

impl BackedUp {
    pub fn backup(&self) -> &Path {
        &self.backup
    }
}

/// New archive copied into webapps/.
/// Available actions: `start_server()`
#[derive(Debug, Clone)]
pub struct Copied {
    pub(crate) backup: PathBuf,
    pub(crate) deployed: PathBuf,
}

impl Copied {
    pub fn backup(&self) -> &Path {
        &self.backup
    }

    pub fn deployed(&self) -> &Path {
        &self.deployed
    }
}

/// Server restarted with the new archive.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Started {
    pub(crate) backup: Option<PathBuf>,
    pub(crate) deployed: PathBuf,
}

impl Started {
    /// `None` when the backup was discarded.
    pub fn backup(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    pub fn deployed(&self) -> &Path {
        &self.deployed
    }
}
