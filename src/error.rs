// ABOUTME: Application-wide error types for wardeploy.
// ABOUTME: Uses thiserror to unify config, validation, and deployment failures for the CLI.

use thiserror::Error;

use crate::config::ConfigError;
use crate::deploy::{DeployError, ValidationFailure};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    #[error("deployment failed: {0}")]
    Deploy(#[from] DeployError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
