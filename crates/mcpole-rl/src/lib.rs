//! mcpole RL - Tabular Monte Carlo control for the cart-pole task
//!
//! This crate provides the learning core: observation discretization,
//! epsilon-greedy action selection, the per-episode memory, the Q-table with
//! its backward Monte Carlo update, and the training loop that ties them
//! together.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod experience;
pub mod policy;
pub mod q_table;
pub mod report;
pub mod state;
pub mod window;

pub use algorithm::{MonteCarlo, UpdateStats};
pub use config::TrainerConfig;
pub use engine::{shape_reward, EpisodeOutcome, Trainer};
pub use experience::{EpisodeMemory, Transition};
pub use policy::EpsilonGreedy;
pub use q_table::QTable;
pub use report::{FinalPositionLog, TrainingReport};
pub use state::{Discretizer, StateIndex};
pub use window::RewardWindow;
