//! Environment interface consumed by the trainer

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Action, Observation, Reward};

/// Result of advancing the environment by one timestep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: Reward,
    /// The episode reached a terminal state (e.g. the pole fell)
    pub terminated: bool,
    /// The episode was cut short by a time limit
    pub truncated: bool,
}

impl StepOutcome {
    /// Either termination signal ends the episode
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// A synchronous, single-agent simulation the trainer can drive.
///
/// Any error returned from `reset` or `step` is treated as fatal by callers.
pub trait Environment {
    /// Begin a new episode and return the initial observation
    fn reset(&mut self) -> Result<Observation>;

    /// Advance one timestep with the given action
    fn step(&mut self, action: Action) -> Result<StepOutcome>;

    /// Number of discrete actions the environment accepts
    fn action_count(&self) -> usize;

    /// Optional visual side effect
    fn render(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn reset(&mut self) -> Result<Observation> {
        (**self).reset()
    }

    fn step(&mut self, action: Action) -> Result<StepOutcome> {
        (**self).step(action)
    }

    fn action_count(&self) -> usize {
        (**self).action_count()
    }

    fn render(&mut self) -> Result<()> {
        (**self).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_outcome_done() {
        let mut outcome = StepOutcome {
            observation: Observation::default(),
            reward: 1.0,
            terminated: false,
            truncated: false,
        };
        assert!(!outcome.is_done());

        outcome.truncated = true;
        assert!(outcome.is_done());

        outcome.truncated = false;
        outcome.terminated = true;
        assert!(outcome.is_done());
    }
}
