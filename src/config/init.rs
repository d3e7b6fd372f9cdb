// ABOUTME: Config scaffolding for new deployments.
// ABOUTME: Creates wardeploy.yml template files.

use snafu::ResultExt;
use std::path::{Path, PathBuf};

use super::error::{AlreadyExistsSnafu, ConfigError, WriteSnafu};
use super::{CONFIG_FILENAME, Config};

pub fn init_config(
    dir: &Path,
    server_home: Option<&Path>,
    force: bool,
) -> Result<PathBuf, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return AlreadyExistsSnafu { path: config_path }.fail();
    }

    let mut config = Config::template();

    if let Some(home) = server_home {
        config.set_server_home(home);
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml).context(WriteSnafu { path: &config_path })?;

    Ok(config_path)
}

fn generate_template_yaml(config: &Config) -> String {
    let server_home = config
        .server_home
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    format!(
        r#"# Tomcat installation containing bin/ and webapps/
# (falls back to $TOMCAT_HOME when omitted)
server_home: {}

# Keep webapps.<timestamp>.zip in server_home after a successful deploy
keep_backup: {}

# Web archive to deploy when --archive is not given
# archive: /path/to/app.war

# Override the lifecycle script names inside bin/
# scripts:
#   startup: startup.sh
#   shutdown: shutdown.sh
"#,
        server_home, config.keep_backup
    )
}
