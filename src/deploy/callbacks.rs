// ABOUTME: Progress, error, and completion sinks for callback-driven deployments.
// ABOUTME: The completion sink is wrapped so it fires exactly once, even if a sink panics.

use super::error::DeployError;

type ProgressSink = Box<dyn FnMut(&str) + Send>;
type ErrorSink = Box<dyn FnOnce(DeployError) + Send>;
type CompletionSink = Box<dyn FnOnce() + Send>;

/// The three sinks a deployment reports through.
///
/// All of them are invoked from the deployment's background task, so a
/// sink that updates UI state must hand the work back to its own thread.
pub struct Callbacks {
    pub(crate) on_progress: ProgressSink,
    pub(crate) on_error: ErrorSink,
    pub(crate) on_complete: CompletionSink,
}

impl Callbacks {
    pub fn new(
        on_progress: impl FnMut(&str) + Send + 'static,
        on_error: impl FnOnce(DeployError) + Send + 'static,
        on_complete: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            on_progress: Box::new(on_progress),
            on_error: Box::new(on_error),
            on_complete: Box::new(on_complete),
        }
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

/// Completion sink that runs when fired or, failing that, when dropped.
pub(crate) struct Completion(Option<CompletionSink>);

impl Completion {
    pub(crate) fn new(sink: CompletionSink) -> Self {
        Self(Some(sink))
    }

    pub(crate) fn fire(mut self) {
        if let Some(sink) = self.0.take() {
            sink();
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(sink) = self.0.take() {
            sink();
        }
    }
}
