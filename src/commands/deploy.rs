// ABOUTME: Check and deploy command implementations.
// ABOUTME: Merges CLI flags over the config file and drives the orchestrator.

use std::path::Path;
use wardeploy::config::Config;
use wardeploy::deploy::{DeployPhase, Orchestrator, ProgressEvent};
use wardeploy::error::Result;
use wardeploy::output::Output;

use crate::cli::TargetArgs;

/// Load the config file (if any) and apply command-line overrides.
pub fn resolve_config(cwd: &Path, target: &TargetArgs) -> Result<Config> {
    let mut config = Config::discover_or_default(cwd)?;

    if let Some(archive) = &target.archive {
        config.archive = Some(archive.clone());
    }
    if let Some(server_home) = &target.server_home {
        config.set_server_home(server_home);
    }

    Ok(config)
}

/// Validate the deployment inputs without stopping the server.
pub fn check(config: Config, output: &Output) -> Result<()> {
    let orchestrator = Orchestrator::from_config(config);
    let request = orchestrator.validate()?;

    output.success(&format!(
        "Ready to deploy {} into {}",
        request.archive().display(),
        request.webapps_dir().display()
    ));
    Ok(())
}

/// Run the full redeploy workflow.
pub async fn deploy(config: Config, mut output: Output) -> Result<()> {
    output.start_timer();
    let orchestrator = Orchestrator::from_config(config);

    output.phase(&ProgressEvent::from(DeployPhase::Validating));
    let mut handle = orchestrator.start()?;

    while let Some(event) = handle.next_event().await {
        // already reported before validation ran
        if event.phase != DeployPhase::Validating {
            output.phase(&event);
        }
    }

    let report = handle.wait().await?;

    for warning in &report.warnings {
        output.warning(&warning.message);
    }
    if let Some(backup) = &report.backup {
        output.progress(&format!("Backup kept at {}", backup.display()));
    }

    output.success(&format!("Deployed {}", report.deployed.display()));
    Ok(())
}
