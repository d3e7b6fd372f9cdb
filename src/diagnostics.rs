// ABOUTME: Non-fatal findings gathered while a deployment runs.
// ABOUTME: Each finding is logged when recorded and handed back in the final report.

use serde::Serialize;

/// Warnings recorded by a single deployment, in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Log `warning` at WARN level and keep it.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// Something that went wrong without ending the deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn backup_cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::BackupCleanup,
            message: message.into(),
        }
    }

    pub fn backup_incomplete(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::BackupIncomplete,
            message: message.into(),
        }
    }

    pub fn script_exit(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ScriptExit,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A backup that should have been discarded is still on disk.
    BackupCleanup,
    /// An entry under webapps/ could not be put into the backup.
    BackupIncomplete,
    /// A start/stop script exited non-zero.
    ScriptExit,
}
