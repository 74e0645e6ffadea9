//! Config commands.
//!
//! Provides validate, show, and render subcommands over layered agent
//! config files.

use agent_config::{ConfigLoader, ConfigMap, OutputFormat, write_config_atomic};
use anyhow::{Context, Result, anyhow};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Load a config with its inheritance chain and validate the result
    Validate {
        /// Path to the config to validate
        #[arg(long)]
        config: PathBuf,
    },

    /// Print the fully merged configuration
    Show {
        /// Path to the config to load
        #[arg(long)]
        config: PathBuf,

        /// Output as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Write the fully merged configuration to a standalone file
    Render {
        /// Path to the config to load
        #[arg(long)]
        config: PathBuf,

        /// Destination file
        #[arg(long, short)]
        output: PathBuf,

        /// Output format (defaults to the output file's extension)
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Format {
    Yaml,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => Self::Yaml,
            Format::Json => Self::Json,
        }
    }
}

pub fn execute(cmd: ConfigCommands, base_dir: PathBuf) -> Result<()> {
    let loader = ConfigLoader::new(base_dir);
    match cmd {
        ConfigCommands::Validate { config } => cmd_validate(&loader, &config),
        ConfigCommands::Show { config, json } => cmd_show(&loader, &config, json),
        ConfigCommands::Render {
            config,
            output,
            format,
        } => cmd_render(&loader, &config, &output, format),
    }
}

fn load(loader: &ConfigLoader, config: &Path) -> Result<ConfigMap> {
    tracing::info!(
        config = %config.display(),
        base_dir = %loader.base_dir().display(),
        "loading config"
    );
    loader
        .load_config(config)
        .map_err(|err| anyhow!("Config validation failed: {err}"))
}

fn cmd_validate(loader: &ConfigLoader, config: &Path) -> Result<()> {
    load(loader, config)?;
    println!(
        "{} Config {} is valid",
        "OK".green(),
        config.display().to_string().cyan()
    );
    Ok(())
}

fn cmd_show(loader: &ConfigLoader, config: &Path, json_output: bool) -> Result<()> {
    let merged = load(loader, config)?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&merged)?);
    } else {
        print!("{}", serde_yaml::to_string(&merged)?);
    }
    Ok(())
}

fn cmd_render(
    loader: &ConfigLoader,
    config: &Path,
    output: &Path,
    format: Option<Format>,
) -> Result<()> {
    let merged = load(loader, config)?;
    let format = format.map_or_else(|| OutputFormat::from_path(output), OutputFormat::from);
    write_config_atomic(output, &merged, format)
        .with_context(|| format!("Failed to render config to {}", output.display()))?;
    println!(
        "{} Rendered {} to {}",
        "OK".green(),
        config.display(),
        output.display().to_string().cyan()
    );
    Ok(())
}
