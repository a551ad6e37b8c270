//! mcpole Core - Shared types, errors, and the environment interface
//!
//! This crate provides the foundational types used across all mcpole
//! components, plus a built-in cart-pole simulator that implements the
//! [`Environment`] trait.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod cartpole;
pub mod env;
pub mod error;
pub mod types;
pub mod util;

pub use cartpole::{CartPole, CartPoleConfig};
pub use env::{Environment, StepOutcome};
pub use error::{PoleError, Result};
pub use types::{Action, Observation, Reward};
