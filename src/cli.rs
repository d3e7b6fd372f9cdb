// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wardeploy")]
#[command(about = "Redeploy a web archive into Tomcat with an automatic webapps backup")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new wardeploy.yml configuration file
    Init {
        /// Tomcat installation to write into the template
        #[arg(long)]
        server_home: Option<PathBuf>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Check the archive and server layout without touching the server
    Check(TargetArgs),

    /// Stop Tomcat, back up webapps/, copy the archive, and start Tomcat again
    Deploy {
        #[command(flatten)]
        target: TargetArgs,

        /// Keep the webapps backup after a successful deploy
        #[arg(long)]
        keep_backup: Option<bool>,
    },
}

#[derive(Args)]
pub struct TargetArgs {
    /// Web archive to deploy
    #[arg(short, long)]
    pub archive: Option<PathBuf>,

    /// Tomcat installation containing bin/ and webapps/ (default: config, then $TOMCAT_HOME)
    #[arg(short, long)]
    pub server_home: Option<PathBuf>,
}
