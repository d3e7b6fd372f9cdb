// ABOUTME: Configuration error types with SNAFU pattern.
// ABOUTME: Context selectors carry the file path for load, parse, and write failures.

use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    #[snafu(display("configuration file not found in {}", dir.display()))]
    NotFound { dir: PathBuf },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse {}: {source}", path.display()))]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[snafu(display("YAML parse error: {source}"))]
    Syntax { source: serde_yaml::Error },

    #[snafu(display("file already exists: {}", path.display()))]
    AlreadyExists { path: PathBuf },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("invalid configuration: {message}"))]
    Invalid { message: String },
}

impl ConfigError {
    /// Whether discovery found no configuration file at all.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}
