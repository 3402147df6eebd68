//! fsdeploy CLI - rule-based file deployment
//!
//! Usage: fsdeploy <COMMAND>
//!
//! Commands:
//!   deploy  Deploy the workspace (or one file with --file)
//!   watch   Deploy each file as it is saved
//!   status  Show deploy status for the workspace or a file

use std::io;

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands};
use commands::CommandContext;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = CommandContext::new(cli.workspace.as_deref(), cli.config, cli.json, cli.verbose)?;

    match cli.command {
        Commands::Deploy { file, strict } => {
            commands::deploy::cmd_deploy(&ctx, file.as_deref(), strict)
        }
        Commands::Watch => commands::watch::cmd_watch(&ctx),
        Commands::Status { file } => commands::status::cmd_status(&ctx, file.as_deref()),
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
