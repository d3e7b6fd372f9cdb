// ABOUTME: Command module aggregator for the wardeploy CLI.
// ABOUTME: Re-exports init, check, and deploy command handlers.

mod deploy;
mod init;

pub use deploy::{check, deploy, resolve_config};
pub use init::init;
