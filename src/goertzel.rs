//! Single-bin Goertzel recursion.
//! https://en.wikipedia.org/wiki/Goertzel_algorithm
//!
//! The filter is tuned by a precomputed coefficient `2 * cos(2 * pi * f / fs)`.
//! Deriving that coefficient is left to the caller.

/// Block power of `samples` at the bin selected by `coeff`.
///
/// Runs the recursion from a zeroed state and returns
/// `s[N-2]^2 + s[N-1]^2 - coeff * s[N-1] * s[N-2]`. An empty block has zero power.
///
/// Example:
/// ```
/// use goertzel_tone::goertzel::block_power;
///
/// // coeff == 2.0 selects the DC bin, so a constant block gives N^2 * A^2
/// let power = block_power(&[1.0; 20], 2.0);
/// assert_eq!(power, 400.0);
///
/// assert_eq!(block_power(&[0.0; 64], 1.3), 0.0);
/// ```
pub fn block_power(samples: &[f32], coeff: f32) -> f32 {
    let mut filter = Goertzel::new(coeff);
    for &sample in samples {
        filter.process(sample);
    }
    filter.power()
}

/// Stateful Goertzel filter, fed one sample at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goertzel {
    s_prev: f32,
    s_prev2: f32,
    coeff: f32,
}

impl Goertzel {
    /// Create a filter with a zeroed state
    pub fn new(coeff: f32) -> Self {
        Self {
            s_prev: 0.0,
            s_prev2: 0.0,
            coeff,
        }
    }

    /// Process a single sample
    /// s[n] = x[n] + coeff * s[n-1] - s[n-2]
    #[inline]
    pub fn process(&mut self, sample: f32) {
        let s = sample + self.coeff * self.s_prev - self.s_prev2;
        self.s_prev2 = self.s_prev;
        self.s_prev = s;
    }

    /// Power of the samples processed since the last reset
    pub fn power(&self) -> f32 {
        self.s_prev2 * self.s_prev2 + self.s_prev * self.s_prev
            - self.coeff * self.s_prev * self.s_prev2
    }

    /// Reset the filter's state, keeping the coefficient
    pub fn reset(&mut self) {
        self.s_prev = 0.0;
        self.s_prev2 = 0.0;
    }
}
