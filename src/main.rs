// ABOUTME: Entry point for the wardeploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;
use wardeploy::error::{Error, Result};
use wardeploy::output::{Output, OutputMode};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = output_mode(&cli);
    let result = run(cli, mode).await;

    if let Err(e) = result {
        let output = Output::new(mode);
        match &e {
            Error::Validation(failure) => output.validation_failure(failure),
            _ => output.error(&e.to_string()),
        }
        std::process::exit(1);
    }
}

fn output_mode(cli: &Cli) -> OutputMode {
    if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let cwd = env::current_dir()?;
    let output = Output::new(mode);

    match cli.command {
        Commands::Init { server_home, force } => {
            commands::init(&cwd, server_home.as_deref(), force, &output)
        }
        Commands::Check(target) => {
            let config = commands::resolve_config(&cwd, &target)?;
            commands::check(config, &output)
        }
        Commands::Deploy {
            target,
            keep_backup,
        } => {
            let mut config = commands::resolve_config(&cwd, &target)?;
            if let Some(keep) = keep_backup {
                config.keep_backup = keep;
            }
            commands::deploy(config, output).await
        }
    }
}
