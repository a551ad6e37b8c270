//! Training results: the final-position log and the run summary

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use mcpole_core::Result;

use crate::config::TrainerConfig;

/// Cart position at the end of each episode, one slot per episode.
/// Slots for episodes before learning stay at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalPositionLog {
    positions: Vec<f64>,
}

impl FinalPositionLog {
    pub fn new(num_episodes: usize) -> Self {
        Self {
            positions: vec![0.0; num_episodes],
        }
    }

    /// Store the terminal cart position for an episode; out-of-range
    /// episodes are ignored
    pub fn record(&mut self, episode: usize, cart_position: f64) {
        if let Some(slot) = self.positions.get_mut(episode) {
            *slot = cart_position;
        }
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// One value per line
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> Result<()> {
        for position in &self.positions {
            writeln!(writer, "{position:.18e}")?;
        }
        Ok(())
    }

    pub fn save_csv(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_csv(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Summary of a finished training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub episodes_run: usize,
    pub learned: bool,
    /// Episode after which the rolling mean first reached the goal
    pub first_learned_episode: Option<usize>,
    pub final_rolling_mean: f64,
    pub best_episode_reward: f64,
    pub mean_episode_steps: f64,
    pub algorithm: serde_json::Value,
    pub config: TrainerConfig,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TrainingReport {
    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
