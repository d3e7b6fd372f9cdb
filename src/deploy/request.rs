// ABOUTME: User-supplied deployment inputs and their validated form.
// ABOUTME: Validation derives the bin/ and webapps/ paths from the server home.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Directory holding the lifecycle scripts, relative to the server home.
pub const BIN_DIR: &str = "bin";

/// Deployed content root, relative to the server home.
pub const WEBAPPS_DIR: &str = "webapps";

/// What the caller wants deployed, before any checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub archive: Option<PathBuf>,
    pub server_home: Option<PathBuf>,
    pub keep_backup: bool,
}

impl DeploymentRequest {
    pub fn new(archive: impl Into<PathBuf>, server_home: impl Into<PathBuf>) -> Self {
        Self {
            archive: Some(archive.into()),
            server_home: Some(server_home.into()),
            keep_backup: true,
        }
    }

    /// Request built from the config file values, with `TOMCAT_HOME` fallback.
    pub fn from_config(config: &Config) -> Self {
        Self {
            archive: config.archive.clone(),
            server_home: config.server_home(),
            keep_backup: config.keep_backup,
        }
    }

    pub fn keep_backup(mut self, keep: bool) -> Self {
        self.keep_backup = keep;
        self
    }
}

/// A request whose inputs were all found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub(crate) archive: PathBuf,
    pub(crate) server_home: PathBuf,
    pub(crate) bin_dir: PathBuf,
    pub(crate) webapps_dir: PathBuf,
    pub(crate) keep_backup: bool,
}

impl ValidatedRequest {
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// File name the archive keeps once deployed.
    pub fn archive_name(&self) -> &OsStr {
        // validation rejects archives without a file name
        self.archive.file_name().unwrap_or_default()
    }

    pub fn server_home(&self) -> &Path {
        &self.server_home
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn webapps_dir(&self) -> &Path {
        &self.webapps_dir
    }

    /// Where the archive lands inside the content root.
    pub fn deployed_path(&self) -> PathBuf {
        self.webapps_dir.join(self.archive_name())
    }

    pub fn keeps_backup(&self) -> bool {
        self.keep_backup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_keeps_backup_by_default() {
        let request = DeploymentRequest::new("/tmp/app.war", "/opt/tomcat");
        assert!(request.keep_backup);
        assert!(!request.keep_backup(false).keep_backup);
    }

    #[test]
    fn deployed_path_reuses_archive_name() {
        let request = ValidatedRequest {
            archive: PathBuf::from("/builds/app-2.war"),
            server_home: PathBuf::from("/opt/tomcat"),
            bin_dir: PathBuf::from("/opt/tomcat/bin"),
            webapps_dir: PathBuf::from("/opt/tomcat/webapps"),
            keep_backup: false,
        };
        assert_eq!(
            request.deployed_path(),
            PathBuf::from("/opt/tomcat/webapps/app-2.war")
        );
    }

    #[test]
    fn from_config_copies_values() {
        let config = Config {
            server_home: Some(PathBuf::from("/srv/tomcat")),
            archive: Some(PathBuf::from("/builds/app.war")),
            keep_backup: false,
            ..Config::default()
        };
        let request = DeploymentRequest::from_config(&config);
        assert_eq!(request.server_home, Some(PathBuf::from("/srv/tomcat")));
        assert_eq!(request.archive, Some(PathBuf::from("/builds/app.war")));
        assert!(!request.keep_backup);
    }
}
