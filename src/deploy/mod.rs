// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports validation, state markers, the Deployment struct, and the orchestrator.

mod callbacks;
mod deployment;
mod error;
mod orchestrator;
mod phase;
mod request;
mod state;
mod transitions;
mod validate;

pub use callbacks::Callbacks;
pub use deployment::{Deployment, DeploymentReport};
pub use error::{DeployError, DeployErrorKind};
pub use orchestrator::{DeployHandle, Orchestrator};
pub use phase::{DeployPhase, ProgressEvent};
pub use request::{BIN_DIR, DeploymentRequest, ValidatedRequest, WEBAPPS_DIR};
pub use state::{BackedUp, Copied, Started, Stopped, Validated};
pub use validate::{Problem, ValidationFailure, validate};
