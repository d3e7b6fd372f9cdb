// ABOUTME: Configuration types and parsing for wardeploy.yml.
// ABOUTME: Handles YAML parsing, TOMCAT_HOME fallback, and the verify hook used before deploying.

mod error;
mod init;
mod scripts;

pub use error::{ConfigError, InvalidSnafu};
pub use init::init_config;
pub use scripts::ScriptsConfig;

use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "wardeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "wardeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".wardeploy/config.yml";

/// Environment variable consulted when no server home is configured.
pub const SERVER_HOME_ENV: &str = "TOMCAT_HOME";

/// Configuration handed to a deployment.
///
/// `verify` runs right after the path checks pass. A failure is reported to
/// the caller as a validation failure and the deployment never touches the
/// server. The server home accessors let a caller's choice of server flow
/// back into the configuration it came from; sources that do not track a
/// server home keep the default no-op pair.
pub trait VerifyConfig {
    fn verify(&self) -> Result<(), ConfigError>;

    fn server_home(&self) -> Option<PathBuf> {
        None
    }

    fn set_server_home(&mut self, _path: PathBuf) {}
}

impl<F> VerifyConfig for F
where
    F: Fn() -> Result<(), ConfigError>,
{
    fn verify(&self) -> Result<(), ConfigError> {
        self()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_home: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<PathBuf>,

    #[serde(default = "default_keep_backup")]
    pub keep_backup: bool,

    #[serde(default)]
    pub scripts: ScriptsConfig,
}

fn default_keep_backup() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_home: None,
            archive: None,
            keep_backup: default_keep_backup(),
            scripts: ScriptsConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).context(error::SyntaxSnafu)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).context(error::ReadSnafu { path })?;
        serde_yaml::from_str(&content).context(error::ParseSnafu { path })
    }

    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::load(path);
            }
        }

        error::NotFoundSnafu { dir }.fail()
    }

    /// Like [`Config::discover`], but a directory without a config file yields defaults.
    pub fn discover_or_default(dir: &Path) -> Result<Self, ConfigError> {
        match Self::discover(dir) {
            Err(e) if e.is_not_found() => Ok(Config::default()),
            other => other,
        }
    }

    /// Server home to deploy into.
    ///
    /// Falls back to `TOMCAT_HOME` when the config has no non-empty value.
    pub fn server_home(&self) -> Option<PathBuf> {
        self.server_home
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .cloned()
            .or_else(|| {
                env::var_os(SERVER_HOME_ENV)
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            })
    }

    pub fn set_server_home(&mut self, path: impl Into<PathBuf>) {
        self.server_home = Some(path.into());
    }

    pub fn template() -> Self {
        Config {
            server_home: Some(PathBuf::from("/opt/tomcat")),
            archive: None,
            keep_backup: true,
            scripts: ScriptsConfig::default(),
        }
    }
}

impl VerifyConfig for Config {
    fn verify(&self) -> Result<(), ConfigError> {
        self.scripts.verify()
    }

    fn server_home(&self) -> Option<PathBuf> {
        Config::server_home(self)
    }

    fn set_server_home(&mut self, path: PathBuf) {
        Config::set_server_home(self, path);
    }
}
