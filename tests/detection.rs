use std::f32::consts::PI;

use goertzel_tone::{
    block_power, normalized_score, EstimatorConfig, ToneEstimator, DEFAULT_HISTORY_CAPACITY,
};
use pretty_assertions::assert_eq;

const BLOCK: usize = 205;
const TARGET_BIN: f32 = 20.0;

fn target_coeff() -> f32 {
    2.0 * (2.0 * PI * TARGET_BIN / BLOCK as f32).cos()
}

fn tone(bin: f32, amplitude: f32) -> Vec<f32> {
    (0..BLOCK)
        .map(|i| amplitude * (2.0 * PI * bin * i as f32 / BLOCK as f32).sin())
        .collect()
}

/// f64 recursion used as a reference for the f32 implementation
fn reference_power(samples: &[f32], coeff: f64) -> f64 {
    let (mut s_prev, mut s_prev2) = (0f64, 0f64);
    for &x in samples {
        let s = x as f64 + coeff * s_prev - s_prev2;
        s_prev2 = s_prev;
        s_prev = s;
    }
    s_prev2 * s_prev2 + s_prev * s_prev - coeff * s_prev * s_prev2
}

fn reference_stats(values: &[f32]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

fn assert_close(actual: f32, expected: f64, rel: f64) {
    let tolerance = rel * expected.abs().max(1.0);
    assert!(
        (actual as f64 - expected).abs() <= tolerance,
        "{actual} != {expected}"
    );
}

#[test]
fn zero_block_has_zero_power() {
    for coeff in [-3.0, -2.0, 0.0, 1.0, 2.0, 10.0] {
        assert_eq!(block_power(&[0.0; BLOCK], coeff), 0.0);
    }
}

#[test]
fn constant_block_matches_reference() {
    for w in [0.0f32, PI / 2.0, PI] {
        let coeff = 2.0 * w.cos();
        for amplitude in [0.25f32, 1.0, 3.0] {
            let samples = [amplitude; 33];
            let expected = reference_power(&samples, coeff as f64);
            assert_close(block_power(&samples, coeff), expected, 1e-4);
        }
    }

    // closed forms for 33 samples: DC gives (N * A)^2, pi/2 leaves (s[32], s[31]) = (A, 0),
    // pi leaves (s[32], s[31]) = (17A, -16A) and the power collapses to A^2
    assert_eq!(block_power(&[1.0; 33], 2.0), 1089.0);
    assert_eq!(block_power(&[3.0; 33], 0.0), 9.0);
    assert_eq!(block_power(&[3.0; 33], -2.0), 9.0);
}

#[test]
fn history_keeps_every_power_in_order() {
    let mut estimator = ToneEstimator::new();
    let start = estimator.history().cursor();
    let mut powers = Vec::new();

    for i in 0..DEFAULT_HISTORY_CAPACITY {
        assert_eq!(estimator.history().cursor(), (start + i) % DEFAULT_HISTORY_CAPACITY);
        // DC blocks of 4 samples have an exact power of 16 * A^2
        let estimate = estimator.estimate_detailed(&[(i + 1) as f32; 4], 2.0);
        powers.push(estimate.power);
    }

    assert_eq!(estimator.history().cursor(), start);
    let expected: Vec<f32> = (1..=DEFAULT_HISTORY_CAPACITY)
        .map(|a| 16.0 * (a * a) as f32)
        .collect();
    assert_eq!(powers, expected);
    assert_eq!(estimator.history().as_slice(), expected.as_slice());
    assert_eq!(estimator.history().chronological().collect::<Vec<_>>(), expected);

    // next call overwrites the oldest slot
    estimator.estimate(&[0.0; 4], 2.0);
    assert_eq!(estimator.history().as_slice()[0], 0.0);
    assert_eq!(estimator.history().cursor(), 1);
    assert_eq!(estimator.history().chronological().last(), Some(0.0));
}

#[test]
fn statistics_cover_the_whole_history() {
    let coeff = target_coeff();
    let mut estimator = ToneEstimator::new();

    for call in 0..48 {
        let samples = tone(TARGET_BIN, 0.1 + 0.05 * (call % 7) as f32);
        let estimate = estimator.estimate_detailed(&samples, coeff);

        let (mean, std_dev) = reference_stats(estimator.history().as_slice());
        assert_close(estimate.mean, mean, 1e-4);
        assert_close(estimate.std_dev, std_dev, 1e-3);
        assert_eq!(estimator.history().as_slice().len(), DEFAULT_HISTORY_CAPACITY);

        let score = normalized_score(estimate.power, estimate.mean, estimate.std_dev);
        assert_eq!(estimate.score.to_bits(), score.to_bits());
    }
}

#[test]
fn first_call_is_scored_against_zero_slots() {
    // history [p, 0, ..., 0]: mean = p / 32, std = p * sqrt(31) / 32
    // so the score is 32 / (1 + sqrt(31)) - 1 whatever p is
    let expected = 32.0 / (1.0 + 31f64.sqrt()) - 1.0;

    for amplitude in [0.01f32, 1.0, 40.0] {
        let mut estimator = ToneEstimator::new();
        let estimate = estimator.estimate_detailed(&tone(TARGET_BIN, amplitude), target_coeff());
        assert!(estimate.power > 0.0);
        assert_close(estimate.mean, estimate.power as f64 / 32.0, 1e-5);
        assert_close(estimate.score, expected, 1e-4);
    }
}

#[test]
fn warm_up_bias_follows_zero_slots() {
    let samples = tone(33.5, 0.5);
    let mut estimator = ToneEstimator::new();
    let capacity = DEFAULT_HISTORY_CAPACITY as f64;

    for n in 1..=DEFAULT_HISTORY_CAPACITY {
        let score = estimator.estimate(&samples, target_coeff());
        // n equal powers and (32 - n) zeros
        let filled = n as f64 / capacity;
        let expected = 1.0 / (filled + (filled * (1.0 - filled)).sqrt()) - 1.0;
        assert_close(score, expected, 1e-4);
    }
}

#[test]
fn off_target_steady_signal_settles_near_zero() {
    let samples = tone(33.5, 0.5);
    let coeff = target_coeff();
    let mut estimator = ToneEstimator::new();

    let scores: Vec<f32> = (0..64).map(|_| estimator.estimate(&samples, coeff)).collect();
    for &score in &scores[DEFAULT_HISTORY_CAPACITY - 1..] {
        assert!(score.abs() < 1e-3, "{score}");
    }
}

#[test]
fn growing_target_tone_pushes_score_up() {
    let coeff = target_coeff();
    let mut estimator = ToneEstimator::new();

    // a fresh history scores every first block at 32 / (1 + sqrt(31)) - 1 (see
    // warm_up_bias_follows_zero_slots), so settle the baseline on a quiet tone first
    for _ in 0..DEFAULT_HISTORY_CAPACITY {
        estimator.estimate(&tone(TARGET_BIN, 0.1), coeff);
    }

    let scores: Vec<f32> = (1..=DEFAULT_HISTORY_CAPACITY as i32)
        .map(|i| estimator.estimate(&tone(TARGET_BIN, 0.1 * 1.1f32.powi(i)), coeff))
        .collect();

    assert!(scores[0] > 0.1, "{scores:?}");
    for pair in scores.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-3, "{scores:?}");
    }
    assert!(scores[scores.len() - 1] > scores[0] + 1.0, "{scores:?}");
}

#[test]
fn target_tone_stands_out_from_off_target_background() {
    let coeff = target_coeff();
    let mut estimator = ToneEstimator::new();

    let background: Vec<f32> = tone(33.5, 0.5)
        .iter()
        .zip(tone(TARGET_BIN, 0.01))
        .map(|(a, b)| a + b)
        .collect();
    for _ in 0..DEFAULT_HISTORY_CAPACITY {
        estimator.estimate(&background, coeff);
    }
    let quiet = estimator.estimate_detailed(&background, coeff);
    assert!(quiet.score.abs() < 1e-3, "{quiet:?}");

    let with_tone: Vec<f32> = background
        .iter()
        .zip(tone(TARGET_BIN, 0.5))
        .map(|(a, b)| a + b)
        .collect();
    let loud = estimator.estimate_detailed(&with_tone, coeff);

    // 31 slots at the background power and one at the tone power
    let (p0, p1) = (quiet.power as f64, loud.power as f64);
    let capacity = DEFAULT_HISTORY_CAPACITY as f64;
    let others = capacity - 1.0;
    let expected = p1 / ((others * p0 + p1) / capacity + others.sqrt() * (p1 - p0) / capacity) - 1.0;
    assert!(p1 > 100.0 * p0, "{quiet:?} {loud:?}");
    assert_close(loud.score, expected, 1e-4);

    // a single loud block can never score past the one-slot bound
    assert!(loud.score > 3.0, "{loud:?}");
    assert!(loud.score < 32.0 / (1.0 + 31f32.sqrt()), "{loud:?}");
}

#[test]
fn silent_start_is_nan() {
    let mut estimator = ToneEstimator::new();
    let estimate = estimator.estimate_detailed(&[0.0; BLOCK], target_coeff());
    assert!(estimate.score.is_nan());
    assert!(!estimate.is_defined());

    // once the history holds any power, silence scores as -1
    estimator.estimate(&tone(TARGET_BIN, 1.0), target_coeff());
    let estimate = estimator.estimate_detailed(&[0.0; BLOCK], target_coeff());
    assert_eq!(estimate.score, -1.0);
    assert!(estimate.is_defined());
}

#[test]
fn unstable_coefficient_is_not_checked() {
    let mut estimator = ToneEstimator::new();
    let score = estimator.estimate(&[1.0; 4096], 4.0);
    assert!(!score.is_finite() || score.abs() > 1.0);
}

#[test]
fn independent_estimators_do_not_share_history() {
    let config = EstimatorConfig {
        history_capacity: 8,
    };
    let mut a = ToneEstimator::with_config(config).unwrap();
    let mut b = ToneEstimator::with_config(config).unwrap();

    a.estimate(&tone(TARGET_BIN, 1.0), target_coeff());
    assert_eq!(a.history().cursor(), 1);
    assert_eq!(b.history().cursor(), 0);
    assert_eq!(b.history().as_slice(), &[0.0; 8]);

    b.estimate(&tone(TARGET_BIN, 1.0), target_coeff());
    assert_eq!(a.history(), b.history());
}
