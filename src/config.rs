//! Estimator configuration.

use anyhow::{ensure, Result};

/// Number of power values the baseline is computed over
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Length of the power history (default: 32)
    pub history_capacity: usize,
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.history_capacity > 0,
            "history capacity must be greater than 0"
        );
        Ok(())
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}
