//! CLI Argument Parsing
//!
//! Global flags (--json, --verbose, --workspace, --config) are inherited by
//! all subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// fsdeploy - copy or upload workspace files to their deploy targets
#[derive(Parser, Debug)]
#[command(name = "fsdeploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Workspace root (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Configuration file (skips discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy the whole workspace, or a single file with --file
    Deploy {
        /// Deploy only this file through every rule that matches it
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Exit non-zero when any file failed to deploy
        #[arg(long)]
        strict: bool,
    },

    /// Watch the workspace and deploy each saved file
    Watch,

    /// Show whether the workspace (and optionally a file) has a deploy target
    Status {
        /// File to check
        file: Option<PathBuf>,
    },
}
