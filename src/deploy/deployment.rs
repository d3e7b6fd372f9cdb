// ABOUTME: Generic deployment struct parameterized by state.
// ABOUTME: State types carry their own data for compile-time guarantees.

use serde::Serialize;
use std::path::PathBuf;

use crate::diagnostics::{Diagnostics, Warning};

use super::request::ValidatedRequest;
use super::state::Validated;

/// A deployment in progress, parameterized by its current state.
///
/// Steps consume the deployment and return it in the next state, so the
/// stop, backup, copy, start order cannot be broken by a caller.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) request: ValidatedRequest,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) state: S,
}

impl Deployment<Validated> {
    pub fn new(request: ValidatedRequest) -> Self {
        Deployment {
            request,
            diagnostics: Diagnostics::default(),
            state: Validated,
        }
    }
}

impl<S> Deployment<S> {
    pub fn request(&self) -> &ValidatedRequest {
        &self.request
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Non-fatal problems recorded so far.
    pub fn warnings(&self) -> &[Warning] {
        self.diagnostics.warnings()
    }

    pub(crate) fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            request: self.request,
            diagnostics: self.diagnostics,
            state,
        }
    }
}

/// Outcome of a successful deployment.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    /// The archive's new home inside webapps/.
    pub deployed: PathBuf,
    /// Snapshot taken before the copy; `None` when it was discarded.
    pub backup: Option<PathBuf>,
    pub warnings: Vec<Warning>,
}
