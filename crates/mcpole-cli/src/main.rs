//! mcpole CLI - train a cart-pole balancing agent with Monte Carlo control

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{config as config_cmd, train};

#[derive(Parser)]
#[command(name = "mcpole")]
#[command(author, version, about = "Monte Carlo cart-pole trainer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file
    #[arg(short, long, global = true, env = "MCPOLE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent and write its results
    Train(train::TrainArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

fn init_tracing(config: &config::Config, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("mcpole_cli={level},mcpole_rl={level},mcpole_core={level}").into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn main() -> Result<()> {
    // Load environment from mcpole.env file (before parsing args)
    mcpole_core::util::load_env_file();

    let cli = Cli::parse();

    let config = config::Config::load(cli.config.as_deref())?;
    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Train(args) => train::run(config, &args),
        Commands::Config(cmd) => config_cmd::run(cmd, &config, cli.config.as_deref()),
    }
}
