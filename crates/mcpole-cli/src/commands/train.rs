//! Train a cart-pole agent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use mcpole_core::CartPole;
use mcpole_rl::{Trainer, TrainingReport};

use crate::config::Config;

#[derive(Args, Debug, Default)]
pub struct TrainArgs {
    /// Number of episodes to run
    #[arg(short, long)]
    pub episodes: Option<usize>,

    /// Seed for both the agent and the simulator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Never render, even after learning
    #[arg(long)]
    pub headless: bool,

    /// Where to write final cart positions
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the learned Q-table as CSV
    #[arg(long)]
    pub q_table: Option<PathBuf>,

    /// Also write a JSON run report
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl TrainArgs {
    /// Command-line flags take precedence over file and environment settings
    fn apply(&self, config: &mut Config) {
        if let Some(episodes) = self.episodes {
            config.training.num_episodes = episodes;
        }
        if let Some(seed) = self.seed {
            config.training.seed = Some(seed);
            config.environment.seed = Some(seed);
        }
        if self.headless {
            config.training.render = false;
        }
        if let Some(output) = &self.output {
            config.output.final_x_path = output.clone();
        }
        if let Some(path) = &self.q_table {
            config.output.q_table_path = Some(path.clone());
        }
        if let Some(path) = &self.report {
            config.output.report_path = Some(path.clone());
        }
    }
}

pub fn run(mut config: Config, args: &TrainArgs) -> Result<()> {
    args.apply(&mut config);

    let env = CartPole::new(&config.environment);
    let mut trainer =
        Trainer::new(config.training.clone(), env).context("Failed to set up trainer")?;

    let report = trainer.train().context("Training aborted")?;

    if report.learned {
        let path = &config.output.final_x_path;
        trainer
            .final_positions()
            .save_csv(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Final cart positions written to {:?}", path);
    } else {
        warn!(
            "Goal average reward {} not reached, final positions not written",
            config.training.goal_average_reward
        );
    }

    if let Some(path) = &config.output.q_table_path {
        trainer
            .q_table()
            .save_csv(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Q-table written to {:?}", path);
    }

    if let Some(path) = &config.output.report_path {
        report
            .save_json(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report written to {:?}", path);
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &TrainingReport) {
    println!("Training Summary");
    println!("================");
    println!("  Episodes:          {}", report.episodes_run);
    println!("  Learned:           {}", report.learned);
    if let Some(episode) = report.first_learned_episode {
        println!("  Learned at:        episode {episode}");
    }
    println!("  Final mean reward: {:.3}", report.final_rolling_mean);
    println!("  Best episode:      {:.1}", report.best_episode_reward);
    println!("  Mean steps:        {:.1}", report.mean_episode_steps);
    println!("  Duration:          {:.2}s", report.duration_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        let args = TrainArgs {
            episodes: Some(5),
            seed: Some(9),
            headless: true,
            output: Some(PathBuf::from("out.csv")),
            q_table: None,
            report: Some(PathBuf::from("report.json")),
        };

        args.apply(&mut config);

        assert_eq!(config.training.num_episodes, 5);
        assert_eq!(config.training.seed, Some(9));
        assert_eq!(config.environment.seed, Some(9));
        assert!(!config.training.render);
        assert_eq!(config.output.final_x_path, PathBuf::from("out.csv"));
        assert_eq!(config.output.q_table_path, None);
        assert_eq!(config.output.report_path, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = Config::default();
        config.training.num_episodes = 30;
        TrainArgs::default().apply(&mut config);

        assert_eq!(config.training.num_episodes, 30);
        assert!(config.training.render);
    }

    #[test]
    fn test_short_run_writes_requested_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.training.num_episodes = 3;
        config.training.render = false;
        config.output.final_x_path = dir.path().join("final_x.csv");

        let args = TrainArgs {
            seed: Some(1),
            q_table: Some(dir.path().join("q.csv")),
            report: Some(dir.path().join("report.json")),
            ..TrainArgs::default()
        };

        run(config, &args).unwrap();

        // Three episodes cannot lift a 100-episode window to the goal
        assert!(!dir.path().join("final_x.csv").exists());
        let q = std::fs::read_to_string(dir.path().join("q.csv")).unwrap();
        assert_eq!(q.lines().count(), 6usize.pow(4));
        assert!(dir.path().join("report.json").exists());
    }
}
