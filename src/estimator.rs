//! Tone presence score: Goertzel block power normalized against the recent
//! power baseline.

use anyhow::Result;
use tracing::{debug, trace};

use crate::config::EstimatorConfig;
use crate::goertzel::block_power;
use crate::history::PowerHistory;

/// Relative deviation of `power` from the baseline `mean + std_dev`.
///
/// No guard against a zero baseline: `0 / 0` yields NaN and `x / 0` yields an
/// infinity, both handed back to the caller unchanged.
#[inline]
pub fn normalized_score(power: f32, mean: f32, std_dev: f32) -> f32 {
    power / (mean + std_dev) - 1.0
}

/// Everything computed by a single [`ToneEstimator::estimate_detailed`] call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Goertzel power of the block
    pub power: f32,
    /// Mean of the history after the power was recorded
    pub mean: f32,
    /// Population standard deviation of the history after the power was recorded
    pub std_dev: f32,
    /// `power / (mean + std_dev) - 1`
    pub score: f32,
}

impl Estimate {
    /// `false` when the score is NaN or infinite
    pub fn is_defined(&self) -> bool {
        self.score.is_finite()
    }
}

/// Single-bin tone detector with its own power history.
///
/// Example:
/// ```
/// use goertzel_tone::ToneEstimator;
///
/// let mut estimator = ToneEstimator::new();
/// // first block ever: history is [p, 0, 0, ...], mean = p / 32
/// let score = estimator.estimate(&[1.0; 20], 2.0);
/// assert!(score > 0.0);
/// assert_eq!(estimator.history().cursor(), 1);
/// ```
///
/// The estimator is not synchronized. Callers sharing one instance across
/// threads or interrupt contexts must serialize the calls themselves.
#[derive(Debug, Clone)]
pub struct ToneEstimator {
    history: PowerHistory,
}

impl ToneEstimator {
    /// Estimator with the default 32 slot history
    pub fn new() -> Self {
        Self {
            history: PowerHistory::new(crate::DEFAULT_HISTORY_CAPACITY),
        }
    }

    pub fn with_config(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            history: PowerHistory::new(config.history_capacity),
        })
    }

    pub fn history(&self) -> &PowerHistory {
        &self.history
    }

    /// Score of `samples` at the bin selected by `coeff`.
    ///
    /// Records the block power in the history as a side effect.
    pub fn estimate(&mut self, samples: &[f32], coeff: f32) -> f32 {
        self.estimate_detailed(samples, coeff).score
    }

    pub fn estimate_detailed(&mut self, samples: &[f32], coeff: f32) -> Estimate {
        let power = block_power(samples, coeff);
        self.history.push(power);

        let mean = self.history.mean();
        let std_dev = self.history.std_dev();
        if mean + std_dev == 0.0 {
            debug!("Zero power baseline, score is undefined");
        }
        let score = normalized_score(power, mean, std_dev);

        trace!(
            power,
            mean,
            std_dev,
            score,
            cursor = self.history.cursor(),
            "estimate"
        );

        Estimate {
            power,
            mean,
            std_dev,
            score,
        }
    }
}

impl Default for ToneEstimator {
    fn default() -> Self {
        Self::new()
    }
}
