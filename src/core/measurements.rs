use crate::core::errors::MeasurementError;
use num_complex::Complex64;
use rand::Rng;

/// Configuration of a computational-basis measurement.
///
/// Collapse is decided in two stages: if one basis index already carries at
/// least `certainty_threshold` of the probability mass it is selected without
/// consuming randomness, otherwise a single uniform draw selects an index by
/// inverse-CDF sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    certainty_threshold: f64,
    normalize: bool,
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            certainty_threshold: Self::DEFAULT_CERTAINTY_THRESHOLD,
            normalize: false,
        }
    }
}

impl Measurement {
    pub const DEFAULT_CERTAINTY_THRESHOLD: f64 = 0.99;

    /// Creates a measurement with a custom certainty threshold.
    ///
    /// # Errors
    ///
    /// Returns `MeasurementError::InvalidThreshold` unless `0.5 < threshold <= 1.0`.
    /// Above one half at most a single index can qualify.
    pub fn new(certainty_threshold: f64) -> Result<Self, MeasurementError> {
        if !(certainty_threshold > 0.5 && certainty_threshold <= 1.0) {
            return Err(MeasurementError::InvalidThreshold(certainty_threshold));
        }

        Ok(Self {
            certainty_threshold,
            normalize: false,
        })
    }

    /// Normalize the register before computing probabilities.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn certainty_threshold(&self) -> f64 {
        self.certainty_threshold
    }

    pub fn normalizes(&self) -> bool {
        self.normalize
    }

    /// Probability of each basis index, rescaled so that they sum to one.
    pub fn distribution<'a>(
        amplitudes: impl IntoIterator<Item = &'a Complex64>,
    ) -> Result<Vec<f64>, MeasurementError> {
        let mut probs: Vec<f64> = amplitudes.into_iter().map(|a| a.norm_sqr()).collect();
        let sum: f64 = probs.iter().sum();

        if sum == 0.0 {
            return Err(MeasurementError::DegenerateState);
        }

        for p in &mut probs {
            *p /= sum;
        }

        Ok(probs)
    }

    /// Index whose probability reaches the certainty threshold, if any.
    pub fn certain_outcome(&self, probs: &[f64]) -> Option<usize> {
        probs.iter().position(|&p| p >= self.certainty_threshold)
    }

    /// Selects a basis index from a normalized distribution.
    ///
    /// Picks the smallest index whose cumulative probability reaches the draw.
    /// Consumes exactly one draw from `rng` unless the certainty shortcut applies.
    ///
    /// # Errors
    ///
    /// Returns `MeasurementError::NoOutcome` if the draw exceeds the total
    /// cumulative probability.
    pub fn pick_outcome<R: Rng + ?Sized>(
        &self,
        probs: &[f64],
        rng: &mut R,
    ) -> Result<usize, MeasurementError> {
        if let Some(idx) = self.certain_outcome(probs) {
            log::debug!("index {} is certain (p = {:.6})", idx, probs[idx]);
            return Ok(idx);
        }

        let roll: f64 = rng.random();

        let mut cumulative = 0.0;
        for (i, &p) in probs.iter().enumerate() {
            cumulative += p;
            if roll <= cumulative {
                log::debug!("draw {:.6} selected index {} (p = {:.6})", roll, i, p);
                return Ok(i);
            }
        }

        log::warn!(
            "draw {} exceeded cumulative probability {}; no outcome selected",
            roll,
            cumulative
        );
        Err(MeasurementError::NoOutcome { draw: roll })
    }
}
