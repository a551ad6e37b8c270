//! Error types for mcpole

use thiserror::Error;

/// Main error type for mcpole
#[derive(Error, Debug)]
pub enum PoleError {
    /// The environment failed while resetting or stepping. Always fatal.
    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PoleError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment(msg.into())
    }
}

/// Result type alias for mcpole operations
pub type Result<T> = std::result::Result<T, PoleError>;
