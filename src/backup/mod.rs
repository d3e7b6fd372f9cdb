// ABOUTME: Timestamped zip snapshots of the deployed content root.
// ABOUTME: Walks webapps/ recursively and syncs the archive to disk before returning.

mod archive;

pub use archive::{
    BACKUP_PREFIX, BACKUP_TIMESTAMP_FORMAT, BackupSummary, SkipReason, SkippedEntry, backup_path,
    create_backup,
};

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Snapshot of a directory tree into a single archive file.
#[async_trait]
pub trait BackupOps: Send + Sync {
    /// Write every directory and file under `source` into `destination`.
    ///
    /// Returns only once the archive is durable on disk. Entries that could
    /// not be stored are listed in the summary rather than failing the backup.
    async fn backup(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<BackupSummary, BackupError>;
}

/// Zip-based backups, written on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipBackup;

#[async_trait]
impl BackupOps for ZipBackup {
    async fn backup(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<BackupSummary, BackupError> {
        let source = source.to_path_buf();
        let destination = destination.to_path_buf();

        tokio::task::spawn_blocking(move || create_backup(&source, &destination))
            .await
            .map_err(|e| BackupError::Interrupted(e.to_string()))?
    }
}

/// Errors from writing a backup archive.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("cannot create backup file {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read {} while backing up: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {} into the backup: {source}", .entry)]
    Write {
        entry: String,
        source: zip::result::ZipError,
    },

    #[error("cannot flush backup file {}: {source}", .path.display())]
    Sync {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("backup task interrupted: {0}")]
    Interrupted(String),
}
