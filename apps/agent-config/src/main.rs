//! Agent config CLI.
//!
//! The `agent-config` command validates layered agent configs and prints or
//! writes their fully merged form.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "agent-config")]
#[command(about = "Validate and flatten layered agent configuration files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::config::ConfigCommands,

    /// Directory searched for configs not found relative to the working directory
    #[arg(long, global = true, env = agent_config::loader::BASE_DIR_ENV)]
    base_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    let base_dir = cli
        .base_dir
        .unwrap_or_else(agent_config::default_base_dir);
    commands::config::execute(cli.command, base_dir)
}
