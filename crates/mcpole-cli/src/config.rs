//! Configuration loading for the mcpole CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use mcpole_core::CartPoleConfig;
use mcpole_rl::TrainerConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub training: TrainerConfig,
    pub environment: CartPoleConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Final cart positions, written only if training converged
    pub final_x_path: PathBuf,
    /// Learned Q-table as CSV
    pub q_table_path: Option<PathBuf>,
    /// Run summary as JSON
    pub report_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            final_x_path: PathBuf::from("final_x.csv"),
            q_table_path: None,
            report_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit JSON log lines instead of plain text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// An explicit path must exist; otherwise the first file found by
    /// [`Config::find_config_file`] is used, if any.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = explicit {
            tracing::info!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        } else if let Some(path) = Self::find_config_file() {
            tracing::info!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path).required(false));
        } else {
            tracing::info!("No config file found, using defaults");
        }

        // Add environment variables with MCPOLE__ prefix
        builder = builder.add_source(
            Environment::with_prefix("MCPOLE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Find the configuration file
    pub fn find_config_file() -> Option<PathBuf> {
        // Check in order: MCPOLE_CONFIG env, ./mcpole.toml, ~/.config/mcpole/mcpole.toml
        if let Ok(path) = std::env::var("MCPOLE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from("mcpole.toml");
        if local.exists() {
            return Some(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config").join("mcpole").join("mcpole.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration as TOML")
    }
}
