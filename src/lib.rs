//! # Goertzel Tone
//!
//! Single-bin tone presence detection for streams of ADC sample blocks.
//!
//! Each block is run through the Goertzel recursion tuned by a precomputed
//! coefficient `2 * cos(2 * pi * f / fs)`. The resulting block power is stored
//! in a fixed-size circular history and the block is scored against the
//! history's mean and standard deviation:
//!
//! ```text
//! score = power / (mean + std_dev) - 1
//! ```
//!
//! A score near 0 means the bin looks like its recent background. A clearly
//! positive score means the tone is louder than usual. Thresholding is up to
//! the caller.
//!
//! ```
//! use goertzel_tone::ToneEstimator;
//!
//! let coeff = 2.0 * (2.0 * std::f32::consts::PI * 1209.0 / 8000.0).cos();
//! let mut estimator = ToneEstimator::new();
//! let block = vec![0.0f32; 205];
//! let score = estimator.estimate(&block, coeff);
//! // silence on a fresh estimator has a zero baseline
//! assert!(score.is_nan());
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod estimator;
pub mod goertzel;
pub mod history;

pub use config::{EstimatorConfig, DEFAULT_HISTORY_CAPACITY};
pub use estimator::{normalized_score, Estimate, ToneEstimator};
pub use goertzel::{block_power, Goertzel};
pub use history::PowerHistory;
