//! Training configuration

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use mcpole_core::PoleError;

/// Hyperparameters and limits for a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_limits"))]
pub struct TrainerConfig {
    /// Total episodes to run (default 2000)
    #[validate(range(min = 1, message = "num_episodes must be at least 1"))]
    pub num_episodes: usize,

    /// Step cap per episode (default 200)
    #[validate(range(min = 1, message = "max_steps must be at least 1"))]
    pub max_steps: usize,

    /// Bins per observation dimension (default 6)
    #[validate(range(min = 2, message = "num_bins must be greater than 1"))]
    pub num_bins: usize,

    /// Episodes in the rolling reward window (default 100)
    #[validate(range(min = 1, message = "window_size must be at least 1"))]
    pub window_size: usize,

    /// Rolling mean at which training counts as learned (default 195)
    pub goal_average_reward: f64,

    /// Episodes ending before this many steps are penalised (default 195)
    pub success_step_threshold: usize,

    /// Reward for an episode that ends early (default -200)
    pub failure_penalty: f64,

    /// Reward for every other step (default 1)
    pub step_reward: f64,

    /// Discount factor (default 0.99)
    #[validate(range(min = 0.0, max = 1.0, message = "gamma must be in [0, 1]"))]
    pub gamma: f64,

    /// Learning rate (default 0.5)
    #[validate(range(exclusive_min = 0.0, max = 1.0, message = "alpha must be in (0, 1]"))]
    pub alpha: f64,

    /// Epsilon at episode 0 (default 0.5)
    #[validate(range(min = 0.0, max = 1.0, message = "initial_epsilon must be in [0, 1]"))]
    pub initial_epsilon: f64,

    /// Lower bound of the initial Q-values (default -1)
    pub q_init_low: f64,

    /// Upper bound of the initial Q-values (default 1)
    pub q_init_high: f64,

    /// Episode memory size; `None` uses `max_steps`
    pub memory_capacity: Option<usize>,

    /// Seed for the agent's random draws; `None` seeds from entropy
    pub seed: Option<u64>,

    /// Render the environment once learned (default true)
    pub render: bool,

    /// Pause after each rendered frame (default 100 ms)
    pub render_delay_ms: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            num_episodes: 2000,
            max_steps: 200,
            num_bins: 6,
            window_size: 100,
            goal_average_reward: 195.0,
            success_step_threshold: 195,
            failure_penalty: -200.0,
            step_reward: 1.0,
            gamma: 0.99,
            alpha: 0.5,
            initial_epsilon: 0.5,
            q_init_low: -1.0,
            q_init_high: 1.0,
            memory_capacity: None,
            seed: None,
            render: true,
            render_delay_ms: 100,
        }
    }
}

impl TrainerConfig {
    pub fn memory_capacity(&self) -> usize {
        self.memory_capacity.unwrap_or(self.max_steps)
    }

    /// Reject settings that would make training meaningless
    pub fn validate(&self) -> mcpole_core::Result<()> {
        Validate::validate(self)
            .map_err(|e| PoleError::config(format!("Invalid training config: {e}")))
    }
}

fn limit_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rules that span more than one field
fn validate_limits(config: &TrainerConfig) -> Result<(), ValidationError> {
    if !(config.q_init_low < config.q_init_high) {
        return Err(limit_error(
            "q_init_bounds",
            format!(
                "q_init_low ({}) must be below q_init_high ({})",
                config.q_init_low, config.q_init_high
            ),
        ));
    }
    if config.memory_capacity() < config.max_steps {
        return Err(limit_error(
            "memory_capacity",
            format!(
                "memory_capacity ({}) must hold a full episode of {} steps",
                config.memory_capacity(),
                config.max_steps
            ),
        ));
    }
    // A larger threshold penalises every episode, so the goal is unreachable
    if config.success_step_threshold > config.max_steps {
        return Err(limit_error(
            "success_step_threshold",
            format!(
                "success_step_threshold ({}) must not exceed max_steps ({})",
                config.success_step_threshold, config.max_steps
            ),
        ));
    }
    Ok(())
}
