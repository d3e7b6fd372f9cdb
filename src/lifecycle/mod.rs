// ABOUTME: Server lifecycle control through the start/stop scripts in bin/.
// ABOUTME: Runs the platform script, waits for it to exit, and records the exit code.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::config::ScriptsConfig;

/// The two lifecycle transitions of the target server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Start,
    Stop,
}

impl LifecycleAction {
    /// Default script name for the current platform.
    pub fn default_script(&self) -> &'static str {
        match self {
            LifecycleAction::Start if cfg!(windows) => "startup.bat",
            LifecycleAction::Stop if cfg!(windows) => "shutdown.bat",
            LifecycleAction::Start => "startup.sh",
            LifecycleAction::Stop => "shutdown.sh",
        }
    }
}

impl std::fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleAction::Start => write!(f, "start"),
            LifecycleAction::Stop => write!(f, "stop"),
        }
    }
}

/// Outcome of a lifecycle script that ran to completion.
///
/// The exit code is informational only; a non-zero exit does not fail the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRun {
    pub script: PathBuf,
    pub exit_code: Option<i32>,
}

impl ScriptRun {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Starts and stops the target server.
#[async_trait]
pub trait LifecycleOps: Send + Sync {
    /// Run the stop script in `bin_dir` and wait for it to exit.
    async fn stop(&self, bin_dir: &Path) -> Result<ScriptRun, LifecycleError>;

    /// Run the start script in `bin_dir` and wait for it to exit.
    async fn start(&self, bin_dir: &Path) -> Result<ScriptRun, LifecycleError>;
}

/// Errors from locating or launching a lifecycle script.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("{action} script not found: {}", .script.display())]
    ScriptNotFound {
        action: LifecycleAction,
        script: PathBuf,
    },

    #[error("failed to run {action} script {}: {source}", .script.display())]
    Launch {
        action: LifecycleAction,
        script: PathBuf,
        source: std::io::Error,
    },
}

/// Lifecycle control through Tomcat's `startup`/`shutdown` scripts.
#[derive(Debug, Clone, Default)]
pub struct ScriptLifecycle {
    startup: Option<String>,
    shutdown: Option<String>,
}

impl ScriptLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the script names from the `scripts` config section, if any.
    pub fn from_config(scripts: &ScriptsConfig) -> Self {
        Self {
            startup: scripts.startup.clone(),
            shutdown: scripts.shutdown.clone(),
        }
    }

    /// Path of the script for `action` inside `bin_dir`.
    pub fn script_path(&self, bin_dir: &Path, action: LifecycleAction) -> PathBuf {
        let name = match action {
            LifecycleAction::Start => self.startup.as_deref(),
            LifecycleAction::Stop => self.shutdown.as_deref(),
        };
        bin_dir.join(name.unwrap_or_else(|| action.default_script()))
    }

    async fn run(
        &self,
        bin_dir: &Path,
        action: LifecycleAction,
    ) -> Result<ScriptRun, LifecycleError> {
        let script = self.script_path(bin_dir, action);

        if !script.is_file() {
            return Err(LifecycleError::ScriptNotFound { action, script });
        }

        tracing::info!("Running {} script: {}", action, script.display());

        let mut command = interpreter(&script);
        command
            .current_dir(bin_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(home) = bin_dir.parent() {
            command.env("CATALINA_HOME", home);
        }

        let status = command
            .status()
            .await
            .map_err(|source| LifecycleError::Launch {
                action,
                script: script.clone(),
                source,
            })?;

        let run = ScriptRun {
            script,
            exit_code: status.code(),
        };

        if run.success() {
            tracing::info!("{} script completed", action);
        } else {
            tracing::warn!(
                "{} script exited with code {:?}, continuing",
                action,
                run.exit_code
            );
        }

        Ok(run)
    }
}

#[cfg(windows)]
fn interpreter(script: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(script);
    command
}

#[cfg(not(windows))]
fn interpreter(script: &Path) -> Command {
    let mut command = Command::new("sh");
    command.arg(script);
    command
}

#[async_trait]
impl LifecycleOps for ScriptLifecycle {
    async fn stop(&self, bin_dir: &Path) -> Result<ScriptRun, LifecycleError> {
        self.run(bin_dir, LifecycleAction::Stop).await
    }

    async fn start(&self, bin_dir: &Path) -> Result<ScriptRun, LifecycleError> {
        self.run(bin_dir, LifecycleAction::Start).await
    }
}
