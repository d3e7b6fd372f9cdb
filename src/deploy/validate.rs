// ABOUTME: Pre-flight checks run before the server is touched.
// ABOUTME: Accumulates every path problem, then runs the config verify hook.

use nonempty::NonEmpty;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::VerifyConfig;

use super::request::{BIN_DIR, DeploymentRequest, ValidatedRequest, WEBAPPS_DIR};

/// A single reason a deployment cannot start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Problem {
    /// No archive given, or it does not exist.
    ArchiveNotSelected,
    /// No server home given, or it does not exist.
    ServerHomeNotUsable,
    BinDirMissing(PathBuf),
    WebappsDirMissing(PathBuf),
    /// The configuration verify hook failed.
    Config(String),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::ArchiveNotSelected => write!(f, "請選擇佈署檔"),
            Problem::ServerHomeNotUsable => write!(f, "請選擇佈署路徑"),
            Problem::BinDirMissing(path) | Problem::WebappsDirMissing(path) => {
                write!(f, "找不到 {} 請確認您選擇的是正確的Tomcat", path.display())
            }
            Problem::Config(message) => write!(f, "{message}"),
        }
    }
}

/// Every problem found while validating a request, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    problems: NonEmpty<Problem>,
}

impl ValidationFailure {
    pub fn single(problem: Problem) -> Self {
        Self {
            problems: NonEmpty::new(problem),
        }
    }

    /// `None` when there is nothing to report.
    pub fn from_problems(problems: Vec<Problem>) -> Option<Self> {
        NonEmpty::from_vec(problems).map(|problems| Self { problems })
    }

    pub fn problems(&self) -> &NonEmpty<Problem> {
        &self.problems
    }

    pub fn contains(&self, problem: &Problem) -> bool {
        self.problems.iter().any(|p| p == problem)
    }

    pub fn messages(&self) -> Vec<String> {
        self.problems.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationFailure {}

/// Check a request against the filesystem.
///
/// Path checks run in a fixed order and all of them are reported together.
/// The verify hook only runs when the paths are fine, and its failure
/// replaces rather than extends the report.
pub fn validate<V: VerifyConfig + ?Sized>(
    request: &DeploymentRequest,
    verifier: &V,
) -> Result<ValidatedRequest, ValidationFailure> {
    let mut problems = Vec::new();

    let archive = request
        .archive
        .as_deref()
        .filter(|path| path.file_name().is_some() && path.exists());
    if archive.is_none() {
        problems.push(Problem::ArchiveNotSelected);
    }

    let server_home = request.server_home.as_deref().filter(|path| path.exists());
    let layout = match server_home {
        None => {
            problems.push(Problem::ServerHomeNotUsable);
            None
        }
        Some(home) => {
            let bin_dir = home.join(BIN_DIR);
            if !is_path_usable(&bin_dir) {
                problems.push(Problem::BinDirMissing(bin_dir.clone()));
            }

            let webapps_dir = home.join(WEBAPPS_DIR);
            if !is_path_usable(&webapps_dir) {
                problems.push(Problem::WebappsDirMissing(webapps_dir.clone()));
            }

            Some((home, bin_dir, webapps_dir))
        }
    };

    if let Some(failure) = ValidationFailure::from_problems(problems) {
        for problem in failure.problems().iter() {
            tracing::debug!("Validation problem: {}", problem);
        }
        return Err(failure);
    }

    verifier
        .verify()
        .map_err(|e| ValidationFailure::single(Problem::Config(e.to_string())))?;

    match (archive, layout) {
        (Some(archive), Some((home, bin_dir, webapps_dir))) => {
            tracing::info!(
                "Validated deployment of {} into {}",
                archive.display(),
                webapps_dir.display()
            );
            Ok(ValidatedRequest {
                archive: archive.to_path_buf(),
                server_home: home.to_path_buf(),
                bin_dir,
                webapps_dir,
                keep_backup: request.keep_backup,
            })
        }
        // a missing input always records a problem above
        _ => unreachable!("validation passed with a missing input"),
    }
}

/// Exists, without following a trailing symlink.
fn is_path_usable(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_messages_name_the_missing_directory() {
        let problem = Problem::BinDirMissing(PathBuf::from("/opt/tomcat/bin"));
        assert!(problem.to_string().contains("/opt/tomcat/bin"));
    }

    #[test]
    fn empty_problem_list_is_not_a_failure() {
        assert!(ValidationFailure::from_problems(Vec::new()).is_none());
    }

    #[test]
    fn failure_display_lists_every_problem() {
        let failure = ValidationFailure::from_problems(vec![
            Problem::ArchiveNotSelected,
            Problem::ServerHomeNotUsable,
        ])
        .unwrap();
        let text = failure.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(failure.contains(&Problem::ServerHomeNotUsable));
    }

    #[test]
    fn failure_serializes_tagged_problems() {
        let failure = ValidationFailure::from_problems(vec![
            Problem::ArchiveNotSelected,
            Problem::WebappsDirMissing(PathBuf::from("/srv/webapps")),
        ])
        .unwrap();
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["problems"][0]["kind"], "archive_not_selected");
        assert_eq!(json["problems"][1]["kind"], "webapps_dir_missing");
        assert_eq!(json["problems"][1]["detail"], "/srv/webapps");
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_counts_as_usable() {
        let temp = tempfile::tempdir().unwrap();
        let link = temp.path().join("webapps");
        std::os::unix::fs::symlink(temp.path().join("gone"), &link).unwrap();
        assert!(is_path_usable(&link));
    }
}
