//! Epsilon-greedy action selection with episode-annealed epsilon

use rand::Rng;

use mcpole_core::Action;

use crate::q_table::QTable;
use crate::state::StateIndex;

/// Explores with probability `initial_epsilon / (episode + 1)`, otherwise
/// takes the highest-valued action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    initial_epsilon: f64,
}

impl EpsilonGreedy {
    pub fn new(initial_epsilon: f64) -> Self {
        Self { initial_epsilon }
    }

    /// Exploration probability for an episode
    pub fn epsilon(&self, episode: usize) -> f64 {
        self.initial_epsilon / (episode as f64 + 1.0)
    }

    pub fn select_action<R: Rng>(
        &self,
        q_table: &QTable,
        state: StateIndex,
        episode: usize,
        rng: &mut R,
    ) -> Action {
        if rng.gen::<f64>() >= self.epsilon(episode) {
            q_table.best_action(state)
        } else {
            let idx = rng.gen_range(0..q_table.action_count());
            Action::from_index(idx).unwrap_or(Action::PushLeft)
        }
    }
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::new(0.5)
    }
}
