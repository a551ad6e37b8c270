//! Per-episode memory of (state, action, reward) steps

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use mcpole_core::{Action, Reward};

use crate::state::StateIndex;

/// One recorded timestep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: StateIndex,
    pub action: Action,
    pub reward: Reward,
}

impl Transition {
    pub fn new(state: StateIndex, action: Action, reward: Reward) -> Self {
        Self {
            state,
            action,
            reward,
        }
    }
}

/// Bounded buffer of the current episode's transitions.
///
/// Filled front to back while the episode runs and drained back to front by
/// the Monte Carlo update, which leaves it empty for the next episode.
#[derive(Debug, Clone)]
pub struct EpisodeMemory {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl EpisodeMemory {
    /// Create a new memory with given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a transition, evicting the oldest one when full
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Remove and return the most recently recorded transition
    pub fn pop_most_recent(&mut self) -> Option<Transition> {
        self.buffer.pop_back()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Transitions in recording order, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Transition> {
        self.buffer.iter()
    }
}

impl Default for EpisodeMemory {
    fn default() -> Self {
        Self::new(200)
    }
}
