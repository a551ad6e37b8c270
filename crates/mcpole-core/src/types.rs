//! Observation, Action, and Reward types shared by the environment and the agent

use serde::{Deserialize, Serialize};

/// Reward value from environment
pub type Reward = f64;

/// Raw sensor reading produced by the environment each step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Cart position along the track
    pub cart_position: f64,

    /// Cart velocity
    pub cart_velocity: f64,

    /// Pole angle in radians, zero is upright
    pub pole_angle: f64,

    /// Pole angular velocity
    pub pole_velocity: f64,
}

impl Observation {
    pub fn new(cart_position: f64, cart_velocity: f64, pole_angle: f64, pole_velocity: f64) -> Self {
        Self {
            cart_position,
            cart_velocity,
            pole_angle,
            pole_velocity,
        }
    }

    /// Components in digit order: cart position first, pole velocity last
    pub fn to_array(&self) -> [f64; 4] {
        [
            self.cart_position,
            self.cart_velocity,
            self.pole_angle,
            self.pole_velocity,
        ]
    }
}

impl From<[f64; 4]> for Observation {
    fn from(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

/// Action in the cart-pole environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Push the cart to the left
    PushLeft,

    /// Push the cart to the right
    PushRight,
}

impl Action {
    /// Convert action to its column index in a value table
    pub fn to_index(self) -> usize {
        match self {
            Action::PushLeft => 0,
            Action::PushRight => 1,
        }
    }

    /// Create action from index
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Action::PushLeft),
            1 => Some(Action::PushRight),
            _ => None,
        }
    }

    /// Number of discrete actions
    pub fn action_space_size() -> usize {
        2
    }
}
