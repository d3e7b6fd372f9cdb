// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers validation, lifecycle script, backup, and copy failures.

use std::path::PathBuf;

use crate::backup::BackupError;
use crate::lifecycle::LifecycleError;

use super::validate::ValidationFailure;

/// Errors that end a deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Inputs rejected before anything was touched.
    #[error("validation failed:\n{0}")]
    Validation(#[from] ValidationFailure),

    /// A start/stop script could not be found or launched.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Snapshot of webapps/ could not be written.
    #[error("backup failed: {0}")]
    Backup(#[from] BackupError),

    /// The archive could not be copied into webapps/.
    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// The background task panicked or was cancelled.
    #[error("deployment task aborted: {0}")]
    Aborted(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Missing or invalid inputs, or a failed config check.
    Validation,
    /// Lifecycle script missing or not launchable.
    Process,
    /// Reading, writing, or copying files failed.
    Io,
    /// The deployment task itself died.
    Aborted,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Validation(_) => DeployErrorKind::Validation,
            DeployError::Lifecycle(_) => DeployErrorKind::Process,
            DeployError::Backup(_) | DeployError::Copy { .. } => DeployErrorKind::Io,
            DeployError::Aborted(_) => DeployErrorKind::Aborted,
        }
    }

    /// The validation report, if this is a validation failure.
    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            DeployError::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::Problem;
    use crate::lifecycle::LifecycleAction;

    #[test]
    fn kinds_follow_error_taxonomy() {
        let validation = DeployError::from(ValidationFailure::single(Problem::ArchiveNotSelected));
        assert_eq!(validation.kind(), DeployErrorKind::Validation);
        assert!(validation.validation_failure().is_some());

        let process = DeployError::from(LifecycleError::ScriptNotFound {
            action: LifecycleAction::Start,
            script: PathBuf::from("bin/startup.sh"),
        });
        assert_eq!(process.kind(), DeployErrorKind::Process);
        assert!(process.validation_failure().is_none());

        let copy = DeployError::Copy {
            from: PathBuf::from("app.war"),
            to: PathBuf::from("webapps/app.war"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(copy.kind(), DeployErrorKind::Io);
    }
}
