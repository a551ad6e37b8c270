//! Observation discretization
//!
//! Each of the four observation dimensions is clamped to a fixed range and
//! split into `num_bins` equal-width bins. The four bin indices are combined
//! into one state index as a base-`num_bins` number whose least significant
//! digit is the cart position and most significant digit is the pole
//! velocity.

use serde::{Deserialize, Serialize};

use mcpole_core::{Observation, PoleError, Result};

/// Discretized encoding of an observation, in `[0, num_bins^4)`
pub type StateIndex = usize;

/// Number of observation dimensions
pub const DIMENSIONS: usize = 4;

/// Clamp range for one observation dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionRange {
    pub low: f64,
    pub high: f64,
}

impl DimensionRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// Ranges in digit order: cart position, cart velocity, pole angle, pole velocity
pub const DEFAULT_RANGES: [DimensionRange; DIMENSIONS] = [
    DimensionRange::new(-2.4, 2.4),
    DimensionRange::new(-3.0, 3.0),
    DimensionRange::new(-0.5, 0.5),
    DimensionRange::new(-2.0, 2.0),
];

/// Maps continuous observations onto a finite set of states
#[derive(Debug, Clone)]
pub struct Discretizer {
    num_bins: usize,
    state_count: usize,
    /// `num_bins - 1` interior boundaries per dimension, ascending
    boundaries: [Vec<f64>; DIMENSIONS],
}

impl Discretizer {
    /// Create a discretizer over the default cart-pole ranges
    pub fn new(num_bins: usize) -> Result<Self> {
        Self::with_ranges(num_bins, DEFAULT_RANGES)
    }

    /// Create a discretizer over custom ranges
    pub fn with_ranges(num_bins: usize, ranges: [DimensionRange; DIMENSIONS]) -> Result<Self> {
        if num_bins <= 1 {
            return Err(PoleError::config(format!(
                "num_bins must be greater than 1, got {num_bins}"
            )));
        }

        let state_count = num_bins
            .checked_pow(DIMENSIONS as u32)
            .ok_or_else(|| {
                PoleError::config(format!("num_bins {num_bins} yields too many states"))
            })?;

        for range in &ranges {
            if !(range.low < range.high) {
                return Err(PoleError::config(format!(
                    "invalid dimension range [{}, {}]",
                    range.low, range.high
                )));
            }
        }

        let boundaries = ranges.map(|range| interior_boundaries(range, num_bins));

        Ok(Self {
            num_bins,
            state_count,
            boundaries,
        })
    }

    /// Total number of distinct states, `num_bins^4`
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// Interior boundaries for one dimension
    pub fn boundaries(&self, dimension: usize) -> &[f64] {
        &self.boundaries[dimension]
    }

    /// Bin index of every dimension, in digit order
    pub fn digits(&self, observation: &Observation) -> [usize; DIMENSIONS] {
        let values = observation.to_array();
        let mut digits = [0; DIMENSIONS];
        for (dim, digit) in digits.iter_mut().enumerate() {
            *digit = bin_index(&self.boundaries[dim], values[dim]);
        }
        digits
    }

    /// Encode an observation as a single state index
    pub fn discretize(&self, observation: &Observation) -> StateIndex {
        self.digits(observation)
            .iter()
            .rev()
            .fold(0, |acc, &digit| acc * self.num_bins + digit)
    }
}

/// Evenly spaced points strictly inside the range, excluding both ends.
/// Computed as `low + i * step` so the middle boundary may sit a rounding
/// error away from zero.
fn interior_boundaries(range: DimensionRange, num_bins: usize) -> Vec<f64> {
    let step = (range.high - range.low) / num_bins as f64;
    (1..num_bins)
        .map(|i| i as f64 * step + range.low)
        .collect()
}

/// First boundary the value lies below; values past the last boundary (and
/// NaN) land in the top bin
fn bin_index(boundaries: &[f64], value: f64) -> usize {
    boundaries
        .iter()
        .position(|&boundary| value < boundary)
        .unwrap_or(boundaries.len())
}
