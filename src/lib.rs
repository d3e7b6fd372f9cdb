// ABOUTME: Library root for wardeploy - exposes the deployment core for the CLI and tests.
// ABOUTME: The main binary is in main.rs.

pub mod backup;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod lifecycle;
pub mod output;
