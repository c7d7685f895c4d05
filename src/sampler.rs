use crate::{Measurement, Operator, QuantumRegister, errors::EngineError};
use rand::Rng;
use std::collections::BTreeMap;

/// A simulator for sampling quantum registers.
///
/// The `Sampler` runs multiple shots of a computational-basis measurement on a
/// register, optionally applying an operator before measurement. The input
/// register is never collapsed.
#[derive(Debug, Clone, Default)]
pub struct Sampler {
    /// Optional operator to apply to the register before measurement.
    pub operator: Option<Operator>,
    /// Measurement configuration used for every shot.
    pub measurement: Measurement,
}

impl Sampler {
    /// Creates a new `Sampler` with the default measurement and no operator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operator applied before measuring.
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Sets the measurement configuration.
    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.measurement = measurement;
        self
    }

    /// Samples `register` `num_shots` times.
    ///
    /// # Arguments
    ///
    /// * `register` - The register to sample. It is cloned, never collapsed.
    /// * `num_shots` - The number of times to repeat the measurement.
    /// * `rng` - Source of the uniform draws, one per shot.
    ///
    /// # Returns
    ///
    /// A `BTreeMap` from basis index to the number of shots that collapsed to it.
    /// The counts always sum to `num_shots`: a draw past the CDF through rounding
    /// is counted in the last bucket.
    ///
    /// # Errors
    ///
    /// Returns an `EngineError` if the operator does not fit the register or the
    /// distribution is degenerate.
    pub fn run<R: Rng + ?Sized>(
        &self,
        register: &QuantumRegister,
        num_shots: usize,
        rng: &mut R,
    ) -> Result<BTreeMap<usize, usize>, EngineError> {
        let mut reg = register.clone();

        if let Some(op) = &self.operator {
            reg.apply(op)?;
        }
        if self.measurement.normalizes() {
            reg.normalize();
        }

        let probs = Measurement::distribution(reg.amplitudes().iter())?;
        let mut counts = BTreeMap::new();

        if let Some(idx) = self.measurement.certain_outcome(&probs) {
            if num_shots > 0 {
                counts.insert(idx, num_shots);
            }
            return Ok(counts);
        }

        // Pre-calculate Cumulative Distribution Function (CDF) once.
        let mut cdf = Vec::with_capacity(probs.len());
        let mut current_sum = 0.0;
        for &p in &probs {
            current_sum += p;
            cdf.push(current_sum);
        }

        let mut raw_counts = vec![0usize; probs.len()];

        for _ in 0..num_shots {
            let r: f64 = rng.random();

            // First bucket whose cumulative probability reaches the draw
            let mut outcome_idx = cdf.partition_point(|&cumulative| cumulative < r);

            // Safety check for floating point rounding errors
            if outcome_idx >= probs.len() {
                log::warn!("draw {} fell past the CDF; counted in last bucket", r);
                outcome_idx = probs.len() - 1;
            }

            raw_counts[outcome_idx] += 1;
        }

        for (idx, &count) in raw_counts.iter().enumerate() {
            if count > 0 {
                counts.insert(idx, count);
            }
        }

        log::debug!(
            "sampled {} shots over {} outcomes",
            num_shots,
            counts.len()
        );
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use num_complex::Complex64;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Returns the same 64-bit word on every call.
    struct FixedRng(u64);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, _dst: &mut [u8]) {
            unimplemented!()
        }
    }

    fn real(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn uniform_superposition_is_roughly_balanced() {
        let reg = QuantumRegister::new(1).unwrap();
        let sampler = Sampler::new().with_operator(Operator::hadamard());
        let mut rng = StdRng::seed_from_u64(2024);

        let counts = sampler.run(&reg, 4000, &mut rng).unwrap();

        let zeros = counts.get(&0).copied().unwrap_or(0);
        let ones = counts.get(&1).copied().unwrap_or(0);
        assert_eq!(zeros + ones, 4000);
        assert!((1700..=2300).contains(&zeros), "zeros = {}", zeros);
    }

    #[test]
    fn basis_state_always_yields_its_index() {
        let reg = QuantumRegister::from_bitstring(3, "011").unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let counts = Sampler::new().run(&reg, 100, &mut rng).unwrap();

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&3], 100);
    }

    #[test]
    fn input_register_is_not_collapsed() {
        let mut reg = QuantumRegister::new(2).unwrap();
        reg.apply(&Operator::hadamard().tensor_power(2).unwrap())
            .unwrap();
        let before = reg.clone();
        let mut rng = StdRng::seed_from_u64(9);

        let counts = Sampler::new().run(&reg, 64, &mut rng).unwrap();

        assert_eq!(counts.values().sum::<usize>(), 64);
        assert_eq!(reg, before);
    }

    #[test]
    fn mismatched_operator_is_reported() {
        let reg = QuantumRegister::new(2).unwrap();
        let sampler = Sampler::new().with_operator(Operator::hadamard());
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            sampler.run(&reg, 10, &mut rng),
            Err(EngineError::RegisterError(_))
        ));
    }

    #[test]
    fn boundary_draw_counts_in_lower_bucket() {
        let reg = QuantumRegister::new(1).unwrap();
        let sampler = Sampler::new().with_operator(Operator::hadamard());
        let mut rng = FixedRng(1 << 63);

        // Both buckets hold 0.5 up to rounding; the draw is exactly 0.5
        let counts = sampler.run(&reg, 10, &mut rng).unwrap();

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&0], 10);
    }

    #[test]
    fn draw_past_cdf_is_clamped_to_last_bucket() {
        // Rescaled probabilities of these amplitudes accumulate to 1 - 2^-52,
        // below the largest possible draw of 1 - 2^-53
        let reg = QuantumRegister::from_amplitudes(array![real(0.1), real(0.3), real(1.0), real(0.3)])
            .unwrap();
        let mut rng = FixedRng(u64::MAX);

        let counts = Sampler::new().run(&reg, 10, &mut rng).unwrap();

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&3], 10);
    }
}
