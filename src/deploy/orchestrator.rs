// ABOUTME: Runs the full redeploy workflow: validate, stop, back up, copy, start.
// ABOUTME: Validation is synchronous; the remaining steps run serially on one background task.

use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::backup::{BackupOps, ZipBackup};
use crate::config::{Config, ConfigError, VerifyConfig};
use crate::lifecycle::{LifecycleOps, ScriptLifecycle};

use super::Deployment;
use super::callbacks::{Callbacks, Completion};
use super::deployment::DeploymentReport;
use super::error::DeployError;
use super::phase::{DeployPhase, ProgressEvent};
use super::request::{DeploymentRequest, ValidatedRequest};
use super::validate::{ValidationFailure, validate};

type DynConfig = dyn VerifyConfig + Send + Sync;

fn no_extra_checks() -> Result<(), ConfigError> {
    Ok(())
}

/// Redeploys one archive into one server installation.
///
/// Callers must not run two deployments against the same server at once;
/// nothing here locks the server directory.
pub struct Orchestrator<L = ScriptLifecycle, B = ZipBackup> {
    request: DeploymentRequest,
    config: Box<DynConfig>,
    lifecycle: Arc<L>,
    backup: Arc<B>,
}

impl Orchestrator {
    /// Orchestrator using Tomcat's scripts and zip backups, with no extra config check.
    pub fn new(request: DeploymentRequest) -> Self {
        Self {
            request,
            config: Box::new(no_extra_checks),
            lifecycle: Arc::new(ScriptLifecycle::new()),
            backup: Arc::new(ZipBackup),
        }
    }

    /// Orchestrator for the values in `config`; `config.verify()` runs during validation.
    pub fn from_config(config: Config) -> Self {
        Self {
            request: DeploymentRequest::from_config(&config),
            lifecycle: Arc::new(ScriptLifecycle::from_config(&config.scripts)),
            backup: Arc::new(ZipBackup),
            config: Box::new(config),
        }
    }
}

impl<L, B> Orchestrator<L, B>
where
    L: LifecycleOps + 'static,
    B: BackupOps + 'static,
{
    pub fn with_lifecycle<L2: LifecycleOps + 'static>(self, lifecycle: L2) -> Orchestrator<L2, B> {
        Orchestrator {
            request: self.request,
            config: self.config,
            lifecycle: Arc::new(lifecycle),
            backup: self.backup,
        }
    }

    pub fn with_backup<B2: BackupOps + 'static>(self, backup: B2) -> Orchestrator<L, B2> {
        Orchestrator {
            request: self.request,
            config: self.config,
            lifecycle: self.lifecycle,
            backup: Arc::new(backup),
        }
    }

    /// Replace the configuration whose check runs after the path checks.
    ///
    /// The request is left alone; use [`Orchestrator::set_server_home`] to
    /// change the server home in both places.
    pub fn with_config(mut self, config: impl VerifyConfig + Send + Sync + 'static) -> Self {
        self.config = Box::new(config);
        self
    }

    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }

    /// The configuration this deployment verifies against.
    pub fn config(&self) -> &DynConfig {
        &*self.config
    }

    pub fn set_archive(&mut self, archive: impl Into<PathBuf>) {
        self.request.archive = Some(archive.into());
    }

    /// Choose the server home for the request and record it in the configuration.
    pub fn set_server_home(&mut self, server_home: impl Into<PathBuf>) {
        let server_home = server_home.into();
        self.config.set_server_home(server_home.clone());
        self.request.server_home = Some(server_home);
    }

    pub fn set_keep_backup(&mut self, keep: bool) {
        self.request.keep_backup = keep;
    }

    /// Run only the pre-flight checks.
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationFailure> {
        validate(&self.request, &*self.config)
    }

    /// Validate, then start the workflow in the background.
    ///
    /// A validation failure is returned right away and nothing is spawned.
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> Result<DeployHandle, ValidationFailure> {
        let (progress, events) = ProgressSender::channel();

        progress.emit(DeployPhase::Validating);
        let request = self.validate()?;

        let lifecycle = Arc::clone(&self.lifecycle);
        let backup = Arc::clone(&self.backup);
        let task = tokio::spawn(async move {
            run_workflow(request, lifecycle.as_ref(), backup.as_ref(), &progress).await
        });

        Ok(DeployHandle { events, task })
    }

    /// Callback-driven variant of [`Orchestrator::start`].
    ///
    /// Progress lines arrive in order, the error sink fires at most once and
    /// only on failure, and the completion sink fires exactly once, last.
    /// On a validation failure the sinks are invoked before this returns.
    /// Otherwise they run on a background task, whose handle is returned.
    pub fn deploy(&self, callbacks: Callbacks) -> Result<JoinHandle<()>, ValidationFailure> {
        let Callbacks {
            mut on_progress,
            on_error,
            on_complete,
        } = callbacks;
        let completion = Completion::new(on_complete);

        let mut handle = match self.start() {
            Ok(handle) => handle,
            Err(failure) => {
                if let Some(message) = DeployPhase::Validating.message() {
                    on_progress(message);
                }
                on_error(DeployError::Validation(failure.clone()));
                completion.fire();
                return Err(failure);
            }
        };

        Ok(tokio::spawn(async move {
            while let Some(event) = handle.events.recv().await {
                if let Some(message) = event.message {
                    on_progress(message);
                }
            }

            if let Err(e) = handle.join().await {
                on_error(e);
            }
            completion.fire();
        }))
    }
}

/// A deployment running in the background.
#[derive(Debug)]
pub struct DeployHandle {
    events: mpsc::UnboundedReceiver<ProgressEvent>,
    task: JoinHandle<Result<DeploymentReport, DeployError>>,
}

impl DeployHandle {
    /// Next phase change, or `None` once the workflow has ended.
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        self.events.recv().await
    }

    /// Wait for the workflow to end. Unread progress events are dropped.
    pub async fn wait(self) -> Result<DeploymentReport, DeployError> {
        self.join().await
    }

    /// Collect every progress event, then the outcome.
    pub async fn collect(mut self) -> (Vec<ProgressEvent>, Result<DeploymentReport, DeployError>) {
        let mut events = Vec::new();
        while let Some(event) = self.events.recv().await {
            events.push(event);
        }
        (events, self.join().await)
    }

    async fn join(self) -> Result<DeploymentReport, DeployError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(DeployError::Aborted(e.to_string())),
        }
    }
}

/// Sending half of the progress channel; also logs every phase change.
struct ProgressSender(mpsc::UnboundedSender<ProgressEvent>);

impl ProgressSender {
    fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }

    fn emit(&self, phase: DeployPhase) {
        tracing::info!(%phase, "Deployment phase changed");
        // a caller that dropped the receiver is not listening
        let _ = self.0.send(ProgressEvent::from(phase));
    }
}

async fn run_workflow<L, B>(
    request: ValidatedRequest,
    lifecycle: &L,
    backup: &B,
    progress: &ProgressSender,
) -> Result<DeploymentReport, DeployError>
where
    L: LifecycleOps + ?Sized,
    B: BackupOps + ?Sized,
{
    let result = execute(request, lifecycle, backup, progress).await;

    match &result {
        Ok(report) => {
            progress.emit(DeployPhase::Done);
            tracing::info!("Deployed {}", report.deployed.display());
        }
        Err(e) => {
            progress.emit(DeployPhase::Failed);
            tracing::error!("Deployment failed: {}", e);
        }
    }

    result
}

async fn execute<L, B>(
    request: ValidatedRequest,
    lifecycle: &L,
    backup: &B,
    progress: &ProgressSender,
) -> Result<DeploymentReport, DeployError>
where
    L: LifecycleOps + ?Sized,
    B: BackupOps + ?Sized,
{
    let deployment = Deployment::new(request);

    progress.emit(DeployPhase::Stopping);
    let deployment = deployment.stop_server(lifecycle).await?;

    progress.emit(DeployPhase::BackingUp);
    let deployment = deployment.backup_webapps(backup, Local::now()).await?;

    progress.emit(DeployPhase::Copying);
    let deployment = deployment.copy_archive().await?;

    progress.emit(DeployPhase::Starting);
    let deployment = deployment.start_server(lifecycle).await?;

    Ok(deployment.finish())
}
