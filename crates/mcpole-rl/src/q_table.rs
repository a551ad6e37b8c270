//! Dense state-action value table

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::{Array2, ArrayView1};
use rand::Rng;

use mcpole_core::{Action, PoleError, Result};

use crate::state::StateIndex;

/// Q-values indexed by `[state][action]`. Shape is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Array2<f64>,
}

impl QTable {
    /// All-zero table
    pub fn zeros(state_count: usize, action_count: usize) -> Self {
        Self {
            values: Array2::zeros((state_count, action_count)),
        }
    }

    /// Table filled with values drawn uniformly from `[low, high)`
    pub fn random<R: Rng>(
        state_count: usize,
        action_count: usize,
        low: f64,
        high: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(low < high) {
            return Err(PoleError::config(format!(
                "invalid Q-table init range [{low}, {high})"
            )));
        }
        let values = Array2::from_shape_fn((state_count, action_count), |_| rng.gen_range(low..high));
        Ok(Self { values })
    }

    /// Table with every entry set to `value`
    pub fn filled(state_count: usize, action_count: usize, value: f64) -> Self {
        Self {
            values: Array2::from_elem((state_count, action_count), value),
        }
    }

    pub fn state_count(&self) -> usize {
        self.values.nrows()
    }

    pub fn action_count(&self) -> usize {
        self.values.ncols()
    }

    pub fn get(&self, state: StateIndex, action: Action) -> f64 {
        self.values[[state, action.to_index()]]
    }

    pub fn set(&mut self, state: StateIndex, action: Action, value: f64) {
        self.values[[state, action.to_index()]] = value;
    }

    /// Action values for one state
    pub fn row(&self, state: StateIndex) -> ArrayView1<'_, f64> {
        self.values.row(state)
    }

    /// Highest-valued action for a state; ties go to the lowest index
    pub fn best_action(&self, state: StateIndex) -> Action {
        let mut best_idx = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (idx, &value) in self.values.row(state).iter().enumerate() {
            if value > best_value {
                best_value = value;
                best_idx = idx;
            }
        }
        Action::from_index(best_idx).unwrap_or(Action::PushLeft)
    }

    /// Underlying array
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// One row per state, comma-separated action values
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> Result<()> {
        for row in self.values.rows() {
            let line = row
                .iter()
                .map(|v| format!("{v:.18e}"))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(writer, "{line}")?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shape() {
        let table = QTable::zeros(1296, 2);
        assert_eq!(table.state_count(), 1296);
        assert_eq!(table.action_count(), 2);
    }

    #[test]
    fn test_random_within_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let table = QTable::random(100, 2, -1.0, 1.0, &mut rng).unwrap();
        assert!(table.values().iter().all(|&v| (-1.0..1.0).contains(&v)));
        // Not all identical
        let first = table.get(0, Action::PushLeft);
        assert!(table.values().iter().any(|&v| v != first));
    }

    #[test]
    fn test_random_rejects_empty_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(QTable::random(4, 2, 1.0, 1.0, &mut rng).is_err());
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = QTable::random(16, 2, -1.0, 1.0, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = QTable::random(16, 2, -1.0, 1.0, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_get_set() {
        let mut table = QTable::zeros(4, 2);
        table.set(3, Action::PushRight, 2.5);
        assert_eq!(table.get(3, Action::PushRight), 2.5);
        assert_eq!(table.get(3, Action::PushLeft), 0.0);
        assert_eq!(table.row(3).to_vec(), vec![0.0, 2.5]);
    }

    #[test]
    fn test_best_action() {
        let mut table = QTable::zeros(2, 2);
        table.set(0, Action::PushRight, 0.1);
        assert_eq!(table.best_action(0), Action::PushRight);

        table.set(1, Action::PushLeft, 0.3);
        table.set(1, Action::PushRight, -0.3);
        assert_eq!(table.best_action(1), Action::PushLeft);
    }

    #[test]
    fn test_best_action_tie_prefers_lowest_index() {
        let table = QTable::filled(1, 2, 0.7);
        assert_eq!(table.best_action(0), Action::PushLeft);
    }

    #[test]
    fn test_write_csv() {
        let mut table = QTable::zeros(3, 2);
        table.set(1, Action::PushRight, 1.5);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        let parsed: Vec<f64> = lines[1].split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(parsed, vec![0.0, 1.5]);
    }
}
