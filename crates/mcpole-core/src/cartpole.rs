//! Built-in cart-pole simulator
//!
//! A pole is hinged to a cart moving on a frictionless track. Each step the
//! agent pushes the cart left or right with a fixed force. The episode fails
//! when the pole tilts more than 12 degrees or the cart leaves the track, and
//! is truncated after `max_episode_steps`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::env::{Environment, StepOutcome};
use crate::error::{PoleError, Result};
use crate::types::{Action, Observation};

const GRAVITY: f64 = 9.8;
const CART_MASS: f64 = 1.0;
const POLE_MASS: f64 = 0.1;
const TOTAL_MASS: f64 = CART_MASS + POLE_MASS;
/// Half the pole's length
const POLE_HALF_LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = POLE_MASS * POLE_HALF_LENGTH;
const FORCE_MAG: f64 = 10.0;
/// Seconds between state updates
const TAU: f64 = 0.02;

const THETA_THRESHOLD: f64 = 12.0 * 2.0 * std::f64::consts::PI / 360.0;
const X_THRESHOLD: f64 = 2.4;

const RESET_BOUND: f64 = 0.05;
const TRACK_WIDTH: usize = 41;

/// Simulator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartPoleConfig {
    /// Seed for the initial-state draw; `None` seeds from entropy
    pub seed: Option<u64>,

    /// Steps after which an episode is truncated
    pub max_episode_steps: usize,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_episode_steps: 200,
        }
    }
}

/// Cart-pole environment
///
/// Observation: [cart_pos, cart_vel, pole_angle, pole_vel]
/// Action: 0 = push left, 1 = push right
pub struct CartPole {
    state: Option<[f64; 4]>,
    steps: usize,
    done: bool,
    max_episode_steps: usize,
    rng: StdRng,
}

impl CartPole {
    /// Create a new environment; call [`Environment::reset`] before stepping
    pub fn new(config: &CartPoleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            state: None,
            steps: 0,
            done: false,
            max_episode_steps: config.max_episode_steps,
            rng,
        }
    }

    /// Steps taken in the current episode
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// ASCII picture of the cart on the track
    pub fn frame(&self) -> String {
        let Some([x, _, theta, _]) = self.state else {
            return format!("[{}]", " ".repeat(TRACK_WIDTH));
        };

        let span = (TRACK_WIDTH - 1) as f64;
        let pos = (((x + X_THRESHOLD) / (2.0 * X_THRESHOLD)) * span).round();
        let pos = pos.clamp(0.0, span) as usize;

        let pole = if theta.abs() < 0.05 {
            '|'
        } else if theta > 0.0 {
            '/'
        } else {
            '\\'
        };

        let mut track = vec![' '; TRACK_WIDTH];
        track[pos] = pole;
        format!(
            "[{}] x={x:+.3} theta={theta:+.3}",
            track.iter().collect::<String>()
        )
    }

    fn is_terminal(state: &[f64; 4]) -> bool {
        state[0].abs() > X_THRESHOLD || state[2].abs() > THETA_THRESHOLD
    }
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new(&CartPoleConfig::default())
    }
}

impl Environment for CartPole {
    fn reset(&mut self) -> Result<Observation> {
        let mut state = [0.0; 4];
        for value in &mut state {
            *value = self.rng.gen_range(-RESET_BOUND..RESET_BOUND);
        }

        self.state = Some(state);
        self.steps = 0;
        self.done = false;

        debug!(?state, "cart-pole reset");
        Ok(Observation::from(state))
    }

    fn step(&mut self, action: Action) -> Result<StepOutcome> {
        let [x, x_dot, theta, theta_dot] = self
            .state
            .ok_or_else(|| PoleError::environment("step called before reset"))?;

        let force = match action {
            Action::PushLeft => -FORCE_MAG,
            Action::PushRight => FORCE_MAG,
        };

        let cos_theta = theta.cos();
        let sin_theta = theta.sin();

        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (POLE_HALF_LENGTH * (4.0 / 3.0 - POLE_MASS * cos_theta * cos_theta / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        // Explicit Euler
        let next = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
        self.state = Some(next);
        self.steps += 1;

        let terminated = Self::is_terminal(&next);
        let truncated = self.steps >= self.max_episode_steps;

        let reward = if self.done {
            warn!("step called after the episode finished; call reset first");
            0.0
        } else {
            1.0
        };
        self.done = self.done || terminated || truncated;

        Ok(StepOutcome {
            observation: Observation::from(next),
            reward,
            terminated,
            truncated,
        })
    }

    fn action_count(&self) -> usize {
        Action::action_space_size()
    }

    fn render(&mut self) -> Result<()> {
        println!("{}", self.frame());
        Ok(())
    }
}
