// ABOUTME: Shared fixtures for integration tests.
// ABOUTME: Builds throwaway Tomcat layouts and recording lifecycle/backup doubles.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wardeploy::backup::{BackupError, BackupOps, BackupSummary, ZipBackup};
use wardeploy::lifecycle::{LifecycleError, LifecycleOps, ScriptRun};

/// A temporary Tomcat installation plus an archive outside of it.
pub struct TomcatFixture {
    _dir: TempDir,
    pub home: PathBuf,
    pub archive: PathBuf,
}

impl TomcatFixture {
    /// `home/bin`, `home/webapps/ROOT/index.html`, and `upload/<archive_name>`.
    pub fn new(archive_name: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("tomcat");
        fs::create_dir_all(home.join("bin")).unwrap();
        fs::create_dir_all(home.join("webapps").join("ROOT")).unwrap();
        fs::write(home.join("webapps/ROOT/index.html"), "<html>root</html>").unwrap();

        let upload = dir.path().join("upload");
        fs::create_dir_all(&upload).unwrap();
        let archive = upload.join(archive_name);
        fs::write(&archive, format!("war bytes of {archive_name}")).unwrap();

        Self {
            _dir: dir,
            home,
            archive,
        }
    }

    pub fn webapps(&self) -> PathBuf {
        self.home.join("webapps")
    }

    pub fn bin(&self) -> PathBuf {
        self.home.join("bin")
    }

    /// Backup zips currently sitting in the server home, sorted by name.
    pub fn backups(&self) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = fs::read_dir(&self.home)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                let name = path.file_name().unwrap().to_string_lossy();
                name.starts_with("webapps.") && name.ends_with(".zip")
            })
            .collect();
        found.sort();
        found
    }

    /// Write an executable shell script into bin/.
    #[cfg(unix)]
    pub fn write_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.bin().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}

/// Shared log of the calls made against the doubles.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Lifecycle double that records calls instead of running scripts.
#[derive(Debug, Clone)]
pub struct RecordingLifecycle {
    log: CallLog,
    stop_exit: Option<i32>,
    fail_start: bool,
}

impl RecordingLifecycle {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            stop_exit: Some(0),
            fail_start: false,
        }
    }

    pub fn stop_exit_code(mut self, code: i32) -> Self {
        self.stop_exit = Some(code);
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }
}

#[async_trait]
impl LifecycleOps for RecordingLifecycle {
    async fn stop(&self, bin_dir: &Path) -> Result<ScriptRun, LifecycleError> {
        self.log.push("stop");
        Ok(ScriptRun {
            script: bin_dir.join("shutdown.sh"),
            exit_code: self.stop_exit,
        })
    }

    async fn start(&self, bin_dir: &Path) -> Result<ScriptRun, LifecycleError> {
        self.log.push("start");
        let script = bin_dir.join("startup.sh");
        if self.fail_start {
            return Err(LifecycleError::ScriptNotFound {
                action: wardeploy::lifecycle::LifecycleAction::Start,
                script,
            });
        }
        Ok(ScriptRun {
            script,
            exit_code: Some(0),
        })
    }
}

/// Backup double that records calls and either zips for real or fails.
#[derive(Debug, Clone)]
pub struct RecordingBackup {
    log: CallLog,
    fail: bool,
}

impl RecordingBackup {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: true,
        }
    }
}

#[async_trait]
impl BackupOps for RecordingBackup {
    async fn backup(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<BackupSummary, BackupError> {
        self.log.push("backup");
        if self.fail {
            return Err(BackupError::Create {
                path: destination.to_path_buf(),
                source: std::io::Error::other("disk full"),
            });
        }
        ZipBackup.backup(source, destination).await
    }
}

/// Names of every entry in a zip archive, sorted.
pub fn zip_entries(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}
