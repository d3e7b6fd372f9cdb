// ABOUTME: Runtime view of the deployment workflow and its progress messages.
// ABOUTME: Each phase maps to at most one human-readable status line.

use serde::Serialize;
use std::fmt;

/// Where a deployment is in its workflow.
///
/// Phases only move forward; `Failed` is reachable from `Validating`
/// through `Starting` and is terminal, like `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployPhase {
    Idle,
    Validating,
    Stopping,
    BackingUp,
    Copying,
    Starting,
    Done,
    Failed,
}

impl DeployPhase {
    /// Status line shown to the user when the phase begins.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            DeployPhase::Validating => Some("資料校驗中..."),
            DeployPhase::Stopping => Some("正在嘗試關閉Tomcat..."),
            DeployPhase::BackingUp => Some("正在進行備份..."),
            DeployPhase::Copying => Some("佈署中..."),
            DeployPhase::Done => Some("佈署完畢，您已經可以結束此佈署程式"),
            DeployPhase::Failed => Some("異常發生，中斷操作"),
            DeployPhase::Idle | DeployPhase::Starting => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployPhase::Done | DeployPhase::Failed)
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployPhase::Idle => "idle",
            DeployPhase::Validating => "validating",
            DeployPhase::Stopping => "stopping",
            DeployPhase::BackingUp => "backing up",
            DeployPhase::Copying => "copying",
            DeployPhase::Starting => "starting",
            DeployPhase::Done => "done",
            DeployPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A phase change reported from the background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub phase: DeployPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<DeployPhase> for ProgressEvent {
    fn from(phase: DeployPhase) -> Self {
        Self {
            phase,
            message: phase.message(),
        }
    }
}
