//! Every-visit Monte Carlo control update

use serde::Serialize;

use crate::experience::EpisodeMemory;
use crate::q_table::QTable;

/// Summary of one episode's update
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UpdateStats {
    /// Transitions drained from memory
    pub transitions: usize,
    /// Mean squared difference between target and old value
    pub loss: f64,
}

/// Backward Monte Carlo update with a constant step size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarlo {
    /// Discount factor
    pub gamma: f64,
    /// Learning rate
    pub alpha: f64,
}

impl MonteCarlo {
    pub fn new(gamma: f64, alpha: f64) -> Self {
        Self { gamma, alpha }
    }

    pub fn name(&self) -> &str {
        "monte_carlo"
    }

    /// Drain `memory` from the last step to the first and move each visited
    /// `Q[s, a]` toward its discounted return.
    ///
    /// When a step is processed, `g` holds the discounted sum of the rewards
    /// that came after it, so the target is `r + gamma * g_after`.
    pub fn update(&self, q_table: &mut QTable, memory: &mut EpisodeMemory) -> UpdateStats {
        let mut g = 0.0;
        let mut transitions = 0;
        let mut squared_error = 0.0;

        while let Some(step) = memory.pop_most_recent() {
            g *= self.gamma;

            let current = q_table.get(step.state, step.action);
            let target = step.reward + g;
            q_table.set(
                step.state,
                step.action,
                current + self.alpha * (target - current),
            );

            g += step.reward;
            transitions += 1;
            squared_error += (target - current).powi(2);
        }

        UpdateStats {
            transitions,
            loss: if transitions > 0 {
                squared_error / transitions as f64
            } else {
                0.0
            },
        }
    }

    /// Parameters as JSON, for logging and reports
    pub fn params(&self) -> serde_json::Value {
        serde_json::json!({
            "algorithm": self.name(),
            "gamma": self.gamma,
            "alpha": self.alpha,
        })
    }
}

impl Default for MonteCarlo {
    fn default() -> Self {
        Self::new(0.99, 0.5)
    }
}
