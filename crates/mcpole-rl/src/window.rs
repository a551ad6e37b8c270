//! Fixed-size sliding window of episode rewards

use std::collections::VecDeque;

/// Holds the total reward of the most recent episodes. Starts full of zeros,
/// so the mean ramps up over the first `size` episodes.
#[derive(Debug, Clone)]
pub struct RewardWindow {
    values: VecDeque<f64>,
}

impl RewardWindow {
    pub fn new(size: usize) -> Self {
        Self {
            values: std::iter::repeat(0.0).take(size).collect(),
        }
    }

    /// Drop the oldest entry and append the newest
    pub fn push(&mut self, episode_reward: f64) {
        if self.values.is_empty() {
            return;
        }
        self.values.pop_front();
        self.values.push_back(episode_reward);
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Oldest first
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_zeros() {
        let window = RewardWindow::new(100);
        assert_eq!(window.len(), 100);
        assert_eq!(window.mean(), 0.0);
    }

    #[test]
    fn test_push_slides() {
        let mut window = RewardWindow::new(3);
        window.push(3.0);
        assert_eq!(window.values().collect::<Vec<_>>(), vec![0.0, 0.0, 3.0]);
        assert_eq!(window.mean(), 1.0);

        window.push(6.0);
        window.push(9.0);
        window.push(12.0);
        assert_eq!(window.values().collect::<Vec<_>>(), vec![6.0, 9.0, 12.0]);
        assert_eq!(window.mean(), 9.0);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_zero_sized_window() {
        let mut window = RewardWindow::new(0);
        window.push(5.0);
        assert!(window.is_empty());
        assert_eq!(window.mean(), 0.0);
    }
}
