// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use chrono::{DateTime, Local};
use std::path::Path;

use crate::backup::{BackupOps, backup_path};
use crate::diagnostics::Warning;
use crate::lifecycle::{LifecycleOps, ScriptRun};

use super::Deployment;
use super::deployment::DeploymentReport;
use super::error::DeployError;
use super::state::{BackedUp, Copied, Started, Stopped, Validated};

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Deployment<S> {
    /// Keep a note of scripts that exited non-zero; the exit code is not acted on.
    fn record_script_run(&mut self, run: &ScriptRun) {
        if !run.success() {
            self.diagnostics.warn(Warning::script_exit(format!(
                "{} exited with code {}",
                run.script.display(),
                run.exit_code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "none (terminated by signal)".to_string())
            )));
        }
    }
}

// =============================================================================
// Validated -> Stopped
// =============================================================================

impl Deployment<Validated> {
    /// Stop the server and wait for the stop script to exit.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Lifecycle` if the stop script is missing or cannot be run.
    #[must_use = "deployment state must be used"]
    pub async fn stop_server<L: LifecycleOps + ?Sized>(
        mut self,
        lifecycle: &L,
    ) -> Result<Deployment<Stopped>, DeployError> {
        let run = lifecycle.stop(self.request.bin_dir()).await?;
        self.record_script_run(&run);
        Ok(self.transition(Stopped))
    }
}

// =============================================================================
// Stopped -> BackedUp
// =============================================================================

impl Deployment<Stopped> {
    /// Snapshot webapps/ into `webapps.<timestamp>.zip` next to it.
    ///
    /// Entries the snapshot had to leave out are recorded as warnings.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Backup` if the archive cannot be written. A partial
    /// file may remain on disk.
    #[must_use = "deployment state must be used"]
    pub async fn backup_webapps<B: BackupOps + ?Sized>(
        mut self,
        backup: &B,
        now: DateTime<Local>,
    ) -> Result<Deployment<BackedUp>, DeployError> {
        let destination = backup_path(self.request.server_home(), now);
        let summary = backup
            .backup(self.request.webapps_dir(), &destination)
            .await?;
        for skipped in &summary.skipped {
            self.diagnostics
                .warn(Warning::backup_incomplete(skipped.to_string()));
        }
        Ok(self.transition(BackedUp {
            backup: destination,
        }))
    }
}

// =============================================================================
// BackedUp -> Copied
// =============================================================================

impl Deployment<BackedUp> {
    /// Copy the archive into webapps/ under its own file name.
    ///
    /// An existing file with that name is overwritten. An archive that
    /// already is `webapps/<name>` is left in place, since copying a file
    /// onto itself would truncate it.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Copy` if reading the archive or writing the copy fails.
    #[must_use = "deployment state must be used"]
    pub async fn copy_archive(self) -> Result<Deployment<Copied>, DeployError> {
        let from = self.request.archive().to_path_buf();
        let to = self.request.deployed_path();

        if is_same_file(&from, &to).await {
            tracing::info!("{} is already deployed in place", to.display());
        } else {
            if to.exists() {
                tracing::debug!("Overwriting {}", to.display());
            }

            let bytes = tokio::fs::copy(&from, &to)
                .await
                .map_err(|source| DeployError::Copy {
                    from: from.clone(),
                    to: to.clone(),
                    source,
                })?;
            tracing::info!("Copied {} ({} bytes) to {}", from.display(), bytes, to.display());
        }

        let backup = self.state.backup.clone();
        Ok(self.transition(Copied {
            backup,
            deployed: to,
        }))
    }
}

/// Both paths resolve to one existing file.
async fn is_same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// =============================================================================
// Copied -> Started
// =============================================================================

impl Deployment<Copied> {
    /// Drop the backup unless it should be kept, then start the server.
    ///
    /// Failing to delete the backup only records a warning.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Lifecycle` if the start script is missing or cannot be run.
    #[must_use = "deployment state must be used"]
    pub async fn start_server<L: LifecycleOps + ?Sized>(
        mut self,
        lifecycle: &L,
    ) -> Result<Deployment<Started>, DeployError> {
        let backup = self.discard_backup().await;

        let run = lifecycle.start(self.request.bin_dir()).await?;
        self.record_script_run(&run);

        let deployed = self.state.deployed.clone();
        Ok(self.transition(Started { backup, deployed }))
    }

    /// Best-effort removal of the backup. Returns the backup path if it is kept.
    async fn discard_backup(&mut self) -> Option<std::path::PathBuf> {
        let backup = self.state.backup.clone();

        if self.request.keeps_backup() {
            return Some(backup);
        }

        match tokio::fs::remove_file(&backup).await {
            Ok(()) => tracing::debug!("Removed backup {}", backup.display()),
            Err(e) => self.diagnostics.warn(Warning::backup_cleanup(format!(
                "could not remove backup {}: {}",
                backup.display(),
                e
            ))),
        }
        None
    }
}

// =============================================================================
// Started (terminal)
// =============================================================================

impl Deployment<Started> {
    /// Finish the deployment and summarize what it produced.
    pub fn finish(self) -> DeploymentReport {
        if !self.diagnostics.is_clean() {
            tracing::info!(
                "Deployment finished with {} warning(s)",
                self.diagnostics.warnings().len()
            );
        }
        DeploymentReport {
            deployed: self.state.deployed,
            backup: self.state.backup,
            warnings: self.diagnostics.into_warnings(),
        }
    }
}
