//! Trainer - Runs episodes and tracks convergence

use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use mcpole_core::{Action, Environment, PoleError, Result, Reward};

use crate::algorithm::MonteCarlo;
use crate::config::TrainerConfig;
use crate::experience::{EpisodeMemory, Transition};
use crate::policy::EpsilonGreedy;
use crate::q_table::QTable;
use crate::report::{FinalPositionLog, TrainingReport};
use crate::state::{Discretizer, StateIndex};
use crate::window::RewardWindow;

/// Reward recorded for a step.
///
/// An episode that ends after fewer than `success_step_threshold` steps gets
/// the failure penalty on its final step; any other step, including the final
/// step of a run that lasted long enough, earns `step_reward`. `step_index`
/// is zero-based, so with the default threshold of 195 a run ending at index
/// 194 is not penalised and one ending at index 193 is.
pub fn shape_reward(config: &TrainerConfig, step_index: usize, done: bool) -> Reward {
    if done && step_index + 1 < config.success_step_threshold {
        config.failure_penalty
    } else {
        config.step_reward
    }
}

/// What happened in one episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeOutcome {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: Reward,
    /// Rolling mean before this episode's reward entered the window
    pub previous_rolling_mean: f64,
    /// Rolling mean after this episode's reward entered the window
    pub rolling_mean: f64,
    /// Whether training had converged by the end of this episode
    pub learned: bool,
}

/// Owns the agent state and drives an environment through training
pub struct Trainer<E: Environment> {
    config: TrainerConfig,
    env: E,
    discretizer: Discretizer,
    policy: EpsilonGreedy,
    algorithm: MonteCarlo,
    q_table: QTable,
    memory: EpisodeMemory,
    window: RewardWindow,
    final_positions: FinalPositionLog,
    learned: bool,
    render_enabled: bool,
    first_learned_episode: Option<usize>,
    episodes_run: usize,
    total_steps: usize,
    best_episode_reward: f64,
    rng: StdRng,
}

impl<E: Environment> Trainer<E> {
    /// Validate the configuration and set up a fresh, randomly initialised agent
    pub fn new(config: TrainerConfig, env: E) -> Result<Self> {
        config.validate()?;

        let action_count = env.action_count();
        if action_count != Action::action_space_size() {
            return Err(PoleError::config(format!(
                "environment exposes {action_count} actions, expected {}",
                Action::action_space_size()
            )));
        }

        let discretizer = Discretizer::new(config.num_bins)?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let q_table = QTable::random(
            discretizer.state_count(),
            action_count,
            config.q_init_low,
            config.q_init_high,
            &mut rng,
        )?;

        info!(
            "Trainer initialized: {} states x {} actions, {} episodes",
            discretizer.state_count(),
            action_count,
            config.num_episodes
        );

        Ok(Self {
            policy: EpsilonGreedy::new(config.initial_epsilon),
            algorithm: MonteCarlo::new(config.gamma, config.alpha),
            memory: EpisodeMemory::new(config.memory_capacity()),
            window: RewardWindow::new(config.window_size),
            final_positions: FinalPositionLog::new(config.num_episodes),
            learned: false,
            render_enabled: false,
            first_learned_episode: None,
            episodes_run: 0,
            total_steps: 0,
            best_episode_reward: f64::NEG_INFINITY,
            discretizer,
            q_table,
            rng,
            config,
            env,
        })
    }

    /// Replace the Q-table, e.g. to start from known values
    pub fn with_q_table(mut self, q_table: QTable) -> Result<Self> {
        if q_table.state_count() != self.discretizer.state_count()
            || q_table.action_count() != Action::action_space_size()
        {
            return Err(PoleError::config(format!(
                "Q-table shape {}x{} does not match {}x{}",
                q_table.state_count(),
                q_table.action_count(),
                self.discretizer.state_count(),
                Action::action_space_size()
            )));
        }
        self.q_table = q_table;
        Ok(self)
    }

    /// Run the full episode budget
    pub fn train(&mut self) -> Result<TrainingReport> {
        let started_at = Utc::now();

        for episode in 0..self.config.num_episodes {
            self.run_episode(episode)?;
        }

        Ok(self.report(started_at))
    }

    /// Run one episode, update the Q-table from it, and check convergence
    pub fn run_episode(&mut self, episode: usize) -> Result<EpisodeOutcome> {
        let observation = self.env.reset()?;
        let mut state = self.discretizer.discretize(&observation);
        let mut action = self.select_action(state, episode);
        let mut cart_position = observation.cart_position;
        let mut episode_reward = 0.0;
        let mut steps = 0;
        let previous_mean = self.window.mean();

        for t in 0..self.config.max_steps {
            if self.render_enabled {
                self.env.render()?;
                std::thread::sleep(Duration::from_millis(self.config.render_delay_ms));
            }
            if self.learned {
                debug!(episode, step = t, cart_position, "cart position");
            }

            let outcome = self.env.step(action)?;
            // The step cap ends the episode even if the environment would go on
            let done = outcome.is_done() || t + 1 == self.config.max_steps;
            let reward = shape_reward(&self.config, t, done);

            self.memory.push(Transition::new(state, action, reward));

            let next_state = self.discretizer.discretize(&outcome.observation);
            action = self.select_action(next_state, episode);
            state = next_state;

            episode_reward += reward;
            steps = t + 1;
            cart_position = outcome.observation.cart_position;

            if done {
                let stats = self.algorithm.update(&mut self.q_table, &mut self.memory);
                debug!(
                    episode,
                    transitions = stats.transitions,
                    loss = stats.loss,
                    "Monte Carlo update"
                );
                self.window.push(episode_reward);
                if self.learned {
                    self.final_positions.record(episode, cart_position);
                }
                break;
            }
        }

        self.episodes_run += 1;
        self.total_steps += steps;
        self.best_episode_reward = self.best_episode_reward.max(episode_reward);

        info!(
            "{} Episode finished after {} time steps / mean {:.3}",
            episode, steps, previous_mean
        );

        let rolling_mean = self.window.mean();

        if rolling_mean >= self.config.goal_average_reward {
            if !self.learned {
                info!("Episode {} train agent successfully!", episode);
                self.first_learned_episode = Some(episode);
                self.render_enabled = self.config.render;
            }
            self.learned = true;
        }

        Ok(EpisodeOutcome {
            episode,
            steps,
            total_reward: episode_reward,
            previous_rolling_mean: previous_mean,
            rolling_mean,
            learned: self.learned,
        })
    }

    fn select_action(&mut self, state: StateIndex, episode: usize) -> Action {
        self.policy
            .select_action(&self.q_table, state, episode, &mut self.rng)
    }

    fn report(&self, started_at: chrono::DateTime<Utc>) -> TrainingReport {
        TrainingReport {
            episodes_run: self.episodes_run,
            learned: self.learned,
            first_learned_episode: self.first_learned_episode,
            final_rolling_mean: self.window.mean(),
            best_episode_reward: if self.episodes_run > 0 {
                self.best_episode_reward
            } else {
                0.0
            },
            mean_episode_steps: if self.episodes_run > 0 {
                self.total_steps as f64 / self.episodes_run as f64
            } else {
                0.0
            },
            algorithm: self.algorithm.params(),
            config: self.config.clone(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn final_positions(&self) -> &FinalPositionLog {
        &self.final_positions
    }

    /// Mean of the reward window as it stands now
    pub fn rolling_mean(&self) -> f64 {
        self.window.mean()
    }

    pub fn is_learned(&self) -> bool {
        self.learned
    }

    pub fn is_render_enabled(&self) -> bool {
        self.render_enabled
    }

    pub fn first_learned_episode(&self) -> Option<usize> {
        self.first_learned_episode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpole_core::{Observation, StepOutcome};

    /// Ends every episode after a fixed number of steps
    struct FixedLengthEnv {
        length: usize,
        step: usize,
        actions: usize,
        renders: usize,
    }

    impl FixedLengthEnv {
        fn new(length: usize) -> Self {
            Self {
                length,
                step: 0,
                actions: 2,
                renders: 0,
            }
        }
    }

    impl Environment for FixedLengthEnv {
        fn reset(&mut self) -> Result<Observation> {
            self.step = 0;
            Ok(Observation::default())
        }

        fn step(&mut self, _action: Action) -> Result<StepOutcome> {
            self.step += 1;
            Ok(StepOutcome {
                observation: Observation::new(self.step as f64 * 0.01, 0.0, 0.0, 0.0),
                reward: 1.0,
                terminated: self.step >= self.length,
                truncated: false,
            })
        }

        fn action_count(&self) -> usize {
            self.actions
        }

        fn render(&mut self) -> Result<()> {
            self.renders += 1;
            Ok(())
        }
    }

    fn quiet_config() -> TrainerConfig {
        TrainerConfig {
            num_episodes: 5,
            window_size: 2,
            seed: Some(42),
            render: false,
            ..TrainerConfig::default()
        }
    }

    #[test]
    fn test_shape_reward_boundary() {
        let config = TrainerConfig::default();
        assert_eq!(shape_reward(&config, 194, true), 1.0);
        assert_eq!(shape_reward(&config, 193, true), -200.0);
        assert_eq!(shape_reward(&config, 10, false), 1.0);
        assert_eq!(shape_reward(&config, 199, true), 1.0);

        let short = TrainerConfig {
            max_steps: 20,
            success_step_threshold: 15,
            ..TrainerConfig::default()
        };
        assert_eq!(shape_reward(&short, 14, true), 1.0);
        assert_eq!(shape_reward(&short, 13, true), -200.0);
    }

    #[test]
    fn test_rejects_wrong_action_count() {
        let mut env = FixedLengthEnv::new(5);
        env.actions = 3;
        let err = Trainer::new(quiet_config(), env).err().unwrap();
        assert!(matches!(err, PoleError::Config(_)));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = TrainerConfig {
            num_bins: 1,
            ..quiet_config()
        };
        assert!(Trainer::new(config, FixedLengthEnv::new(5)).is_err());
    }

    #[test]
    fn test_early_failure_episode() {
        let mut trainer = Trainer::new(quiet_config(), FixedLengthEnv::new(10)).unwrap();
        let outcome = trainer.run_episode(0).unwrap();

        assert_eq!(outcome.steps, 10);
        assert_eq!(outcome.total_reward, 9.0 - 200.0);
        assert_eq!(outcome.rolling_mean, (9.0 - 200.0) / 2.0);
        assert!(!outcome.learned);
    }

    #[test]
    fn test_step_cap_ends_episode() {
        let config = TrainerConfig {
            max_steps: 20,
            success_step_threshold: 15,
            ..quiet_config()
        };
        let mut trainer = Trainer::new(config, FixedLengthEnv::new(1_000)).unwrap();
        let outcome = trainer.run_episode(0).unwrap();

        assert_eq!(outcome.steps, 20);
        assert_eq!(outcome.total_reward, 20.0);
    }

    #[test]
    fn test_learned_after_goal_reached() {
        let config = TrainerConfig {
            goal_average_reward: 150.0,
            ..quiet_config()
        };
        let mut trainer = Trainer::new(config, FixedLengthEnv::new(200)).unwrap();

        let first = trainer.run_episode(0).unwrap();
        assert_eq!(first.total_reward, 200.0);
        assert_eq!(first.rolling_mean, 100.0);
        assert!(!first.learned);
        assert_eq!(trainer.final_positions().positions()[0], 0.0);

        let second = trainer.run_episode(1).unwrap();
        assert!(second.learned);
        assert_eq!(trainer.first_learned_episode(), Some(1));
        assert!(!trainer.is_render_enabled(), "rendering disabled in config");

        trainer.run_episode(2).unwrap();
        assert!((trainer.final_positions().positions()[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_render_flag_latches_on_learning() {
        let config = TrainerConfig {
            goal_average_reward: 100.0,
            render: true,
            render_delay_ms: 0,
            ..quiet_config()
        };
        let mut trainer = Trainer::new(config, FixedLengthEnv::new(200)).unwrap();
        assert!(!trainer.is_render_enabled());

        trainer.run_episode(0).unwrap();
        assert!(trainer.is_learned());
        assert!(trainer.is_render_enabled());
        assert_eq!(trainer.env.renders, 0, "no frames before learning");

        trainer.run_episode(1).unwrap();
        assert_eq!(trainer.env.renders, 200, "one frame per step once learned");
    }

    #[test]
    fn test_render_disabled_in_config_never_renders() {
        let config = TrainerConfig {
            goal_average_reward: 100.0,
            render_delay_ms: 0,
            ..quiet_config()
        };
        let mut trainer = Trainer::new(config, FixedLengthEnv::new(200)).unwrap();
        for episode in 0..3 {
            trainer.run_episode(episode).unwrap();
        }
        assert!(trainer.is_learned());
        assert_eq!(trainer.env.renders, 0);
    }

    #[test]
    fn test_outcome_reports_mean_before_and_after() {
        let mut trainer = Trainer::new(quiet_config(), FixedLengthEnv::new(200)).unwrap();

        let first = trainer.run_episode(0).unwrap();
        assert_eq!(first.previous_rolling_mean, 0.0);
        assert_eq!(first.rolling_mean, 100.0);

        let second = trainer.run_episode(1).unwrap();
        assert_eq!(second.previous_rolling_mean, 100.0);
        assert_eq!(second.rolling_mean, 200.0);
        assert_eq!(trainer.rolling_mean(), 200.0);
    }

    #[test]
    fn test_train_report() {
        let mut trainer = Trainer::new(quiet_config(), FixedLengthEnv::new(30)).unwrap();
        let report = trainer.train().unwrap();

        assert_eq!(report.episodes_run, 5);
        assert!(!report.learned);
        assert_eq!(report.mean_episode_steps, 30.0);
        assert_eq!(report.best_episode_reward, 29.0 - 200.0);
        assert!(report.finished_at >= report.started_at);
    }
}
