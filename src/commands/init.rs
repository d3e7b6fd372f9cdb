// ABOUTME: Init command implementation.
// ABOUTME: Writes a wardeploy.yml template into the working directory.

use std::path::Path;
use wardeploy::config::init_config;
use wardeploy::error::Result;
use wardeploy::output::Output;

pub fn init(cwd: &Path, server_home: Option<&Path>, force: bool, output: &Output) -> Result<()> {
    let path = init_config(cwd, server_home, force)?;
    output.success(&format!("Created {}", path.display()));
    Ok(())
}
