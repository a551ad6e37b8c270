//! Configuration management commands

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

const DEFAULT_CONFIG: &str = include_str!("../../../../mcpole.toml.example");

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(cmd: ConfigCommands, config: &Config, explicit: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(config, explicit),
        ConfigCommands::Init { force } => init(Path::new("mcpole.toml"), force),
    }
}

fn show(config: &Config, explicit: Option<&Path>) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let source = explicit
        .map(Path::to_path_buf)
        .or_else(Config::find_config_file);
    match source {
        Some(path) => println!("Config file: {}\n", path.display()),
        None => println!("No configuration file found. Using defaults.\n"),
    }

    println!("{}", config.to_toml()?);
    Ok(())
}

fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        println!("Configuration file already exists: {}", config_path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    println!("Configuration file created: {}", config_path.display());

    Ok(())
}
