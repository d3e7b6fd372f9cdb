// ABOUTME: Zip writer for webapps/ snapshots and the backup file naming scheme.
// ABOUTME: Entry names are relative to the snapshotted directory, separated by '/'.

use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::BackupError;

/// Stem of every backup file name.
pub const BACKUP_PREFIX: &str = "webapps";

/// `yyyyMMddHHmmss`, local time.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Path of the backup taken at `now` for the server installed in `server_home`.
pub fn backup_path(server_home: &Path, now: DateTime<Local>) -> PathBuf {
    server_home.join(format!(
        "{}.{}.zip",
        BACKUP_PREFIX,
        now.format(BACKUP_TIMESTAMP_FORMAT)
    ))
}

/// Why an entry under the snapshotted directory is not in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Symbolic link whose target does not exist.
    DanglingLink,
    /// Symbolic link to a directory that is already being walked.
    LinkCycle,
    /// Socket, FIFO, device, or similar.
    NotFileOrDirectory,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DanglingLink => write!(f, "symbolic link target does not exist"),
            SkipReason::LinkCycle => {
                write!(f, "symbolic link leads back into a directory already in the backup")
            }
            SkipReason::NotFileOrDirectory => write!(f, "not a regular file or directory"),
        }
    }
}

/// An entry left out of a backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not backed up: {}", self.path.display(), self.reason)
    }
}

/// What a finished backup could not include.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupSummary {
    pub skipped: Vec<SkippedEntry>,
}

impl BackupSummary {
    /// Every entry under the source made it into the archive.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Snapshot `source` into a new zip at `destination`.
///
/// Symbolic links are followed: a linked directory is stored as a directory
/// and a linked file by its contents. Entries that cannot be stored this way
/// are listed in the returned summary. A failed backup leaves whatever was
/// written on disk.
pub fn create_backup(source: &Path, destination: &Path) -> Result<BackupSummary, BackupError> {
    let root = fs::canonicalize(source).map_err(|e| BackupError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    let file = File::create(destination).map_err(|source| BackupError::Create {
        path: destination.to_path_buf(),
        source,
    })?;

    let mut tree = TreeWriter {
        zip: ZipWriter::new(file),
        options: SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated),
        ancestors: vec![root],
        skipped: Vec::new(),
    };
    tree.add_dir(source, "")?;

    let TreeWriter { zip, skipped, .. } = tree;
    let file = zip.finish().map_err(|source| BackupError::Write {
        entry: destination.display().to_string(),
        source,
    })?;
    file.sync_all().map_err(|source| BackupError::Sync {
        path: destination.to_path_buf(),
        source,
    })?;

    tracing::info!(
        skipped = skipped.len(),
        "Backed up {} to {}",
        source.display(),
        destination.display()
    );
    Ok(BackupSummary { skipped })
}

struct TreeWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    /// Canonical paths of the directories on the current walk path.
    ancestors: Vec<PathBuf>,
    skipped: Vec<SkippedEntry>,
}

impl<W: Write + Seek> TreeWriter<W> {
    fn add_dir(&mut self, dir: &Path, prefix: &str) -> Result<(), BackupError> {
        let read_error = |source: io::Error| BackupError::Read {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir)
            .map_err(read_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_error)?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let name = format!("{}{}", prefix, entry.file_name().to_string_lossy());

            // follows symlinks
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(_) if is_symlink(&path) => {
                    self.skip(path, SkipReason::DanglingLink);
                    continue;
                }
                Err(source) => return Err(BackupError::Read { path, source }),
            };

            if metadata.is_dir() {
                let target = fs::canonicalize(&path).map_err(|source| BackupError::Read {
                    path: path.clone(),
                    source,
                })?;
                if self.ancestors.contains(&target) {
                    self.skip(path, SkipReason::LinkCycle);
                    continue;
                }

                self.zip
                    .add_directory(name.as_str(), self.options)
                    .map_err(|source| BackupError::Write {
                        entry: name.clone(),
                        source,
                    })?;
                self.ancestors.push(target);
                let result = self.add_dir(&path, &format!("{name}/"));
                self.ancestors.pop();
                result?;
            } else if metadata.is_file() {
                self.add_file(&path, &name)?;
            } else {
                self.skip(path, SkipReason::NotFileOrDirectory);
            }
        }

        Ok(())
    }

    fn add_file(&mut self, path: &Path, name: &str) -> Result<(), BackupError> {
        let mut input = File::open(path).map_err(|source| BackupError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.zip
            .start_file(name, self.options)
            .map_err(|source| BackupError::Write {
                entry: name.to_string(),
                source,
            })?;
        io::copy(&mut input, &mut self.zip).map_err(|e| BackupError::Write {
            entry: name.to_string(),
            source: e.into(),
        })?;
        Ok(())
    }

    fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        tracing::debug!("Leaving {} out of the backup: {}", path.display(), reason);
        self.skipped.push(SkippedEntry { path, reason });
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}
