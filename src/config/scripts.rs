// ABOUTME: Lifecycle script overrides for the target server.
// ABOUTME: Lets a deployment point at renamed start/stop wrappers inside bin/.

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, InvalidSnafu};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScriptsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown: Option<String>,
}

impl ScriptsConfig {
    /// Reject overrides that could not name a file directly inside `bin/`.
    pub fn verify(&self) -> Result<(), ConfigError> {
        check_script_name("scripts.startup", self.startup.as_deref())?;
        check_script_name("scripts.shutdown", self.shutdown.as_deref())
    }
}

fn check_script_name(field: &str, name: Option<&str>) -> Result<(), ConfigError> {
    let Some(name) = name else {
        return Ok(());
    };

    if name.trim().is_empty() {
        return InvalidSnafu {
            message: format!("{field} cannot be empty"),
        }
        .fail();
    }

    if name.contains('/') || name.contains('\\') {
        return InvalidSnafu {
            message: format!("{field} must be a file name inside bin/, got '{name}'"),
        }
        .fail();
    }

    Ok(())
}
