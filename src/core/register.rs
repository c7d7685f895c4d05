use crate::core::Operator;
use crate::core::errors::{MeasurementError, RegisterError};
use crate::core::measurements::Measurement;
use crate::core::utils;
use ndarray::Array1;
use ndarray::linalg::general_mat_vec_mul;
use num_complex::Complex64;
use rand::Rng;

/// Joint state of `n` qubits as a vector of `2^n` complex amplitudes.
///
/// Index `i` of the amplitude vector is the computational basis state whose
/// big-endian bit string is the binary expansion of `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantumRegister {
    amplitudes: Array1<Complex64>,
    num_qubits: usize,
    last_index: usize,
}

impl QuantumRegister {
    /// Creates a register initialized to |0...0>.
    ///
    /// # Errors
    ///
    /// Returns a `RegisterError` if:
    /// - `num_qubits` is zero (`InvalidQubitCount`).
    /// - `2^num_qubits` does not fit in `usize` (`TooManyQubits`).
    /// - The amplitude buffer cannot be allocated (`AllocationFailed`).
    pub fn new(num_qubits: usize) -> Result<Self, RegisterError> {
        Self::basis_state(num_qubits, 0)
    }

    /// Creates a register in the basis state named by `bits`, most significant qubit first.
    ///
    /// `from_bitstring(2, "10")` puts all amplitude on index 2.
    ///
    /// # Arguments
    ///
    /// * `num_qubits` - Number of qubits in the register.
    /// * `bits` - Exactly `num_qubits` characters from `{'0', '1'}`.
    ///
    /// # Errors
    ///
    /// Returns a `RegisterError` if:
    /// - `num_qubits` is zero or too large, as for [`QuantumRegister::new`].
    /// - `bits` does not have `num_qubits` characters (`BitstringLength`).
    /// - `bits` contains a character other than '0' or '1' (`InvalidBitstringChar`).
    /// - The amplitude buffer cannot be allocated (`AllocationFailed`).
    pub fn from_bitstring(num_qubits: usize, bits: &str) -> Result<Self, RegisterError> {
        utils::dimension_for(num_qubits)?;
        let index = utils::parse_bitstring(bits, num_qubits)?;
        Self::basis_state(num_qubits, index)
    }

    /// Creates a register from an arbitrary amplitude vector.
    ///
    /// The vector is taken as-is; call [`QuantumRegister::normalize`] if needed.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::InvalidDimensions` unless the length is a power
    /// of two of at least 2.
    pub fn from_amplitudes(amplitudes: Array1<Complex64>) -> Result<Self, RegisterError> {
        let dim = amplitudes.len();
        if dim < 2 || !dim.is_power_of_two() {
            return Err(RegisterError::InvalidDimensions(dim));
        }

        Ok(Self {
            amplitudes,
            num_qubits: dim.trailing_zeros() as usize,
            last_index: 0,
        })
    }

    fn basis_state(num_qubits: usize, index: usize) -> Result<Self, RegisterError> {
        let dim = utils::dimension_for(num_qubits)?;
        let mut buf =
            utils::allocate_zeroed(dim).map_err(|_| RegisterError::AllocationFailed { len: dim })?;
        buf[index] = Complex64::new(1.0, 0.0);

        Ok(Self {
            amplitudes: Array1::from_vec(buf),
            num_qubits,
            last_index: index,
        })
    }

    /// Releases the register and its amplitude buffer.
    ///
    /// Consumes `self`, so a register cannot be released twice.
    pub fn release(self) {
        log::trace!("releasing register of {} qubits", self.num_qubits);
    }

    /// Returns the register to |0...0>, leaving the collapsed state.
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
        self.last_index = 0;
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Size of the state space, `2^num_qubits`.
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Basis index the register was last prepared in or collapsed to.
    pub fn last_index(&self) -> usize {
        self.last_index
    }

    /// Squared magnitude of every amplitude, without rescaling.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sum of squared magnitudes of the amplitudes.
    pub fn norm_sqr(&self) -> f64 {
        utils::norm_sqr(self.amplitudes.iter())
    }

    /// Applies an operator spanning the whole register: `psi' = U psi`.
    ///
    /// The result is written into a freshly allocated buffer before replacing
    /// the current amplitudes. No normalization is performed.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::DimensionMismatch` unless the operator is
    /// `dimension x dimension`. The register is left untouched on error.
    pub fn apply(&mut self, operator: &Operator) -> Result<(), RegisterError> {
        let (rows, cols) = operator.matrix.dim();
        let dim = self.dimension();

        if rows != dim || cols != dim {
            return Err(RegisterError::DimensionMismatch {
                expected: dim,
                got_rows: rows,
                got_cols: cols,
            });
        }

        let buf =
            utils::allocate_zeroed(dim).map_err(|_| RegisterError::AllocationFailed { len: dim })?;
        let mut next = Array1::from_vec(buf);

        general_mat_vec_mul(
            Complex64::new(1.0, 0.0),
            &operator.matrix,
            &self.amplitudes,
            Complex64::new(0.0, 0.0),
            &mut next,
        );

        log::trace!("applied {}x{} operator", rows, cols);
        self.amplitudes = next;
        Ok(())
    }

    /// Applies a sequence of operators in order.
    pub fn apply_all<'a>(
        &mut self,
        operators: impl IntoIterator<Item = &'a Operator>,
    ) -> Result<(), RegisterError> {
        for op in operators {
            self.apply(op)?;
        }
        Ok(())
    }

    /// Rescales the amplitudes to unit norm.
    ///
    /// The all-zero vector has no direction and is left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm > 0.0 {
            self.amplitudes.mapv_inplace(|a| a / norm);
        }
    }

    /// Measures every qubit in the computational basis and collapses the state.
    ///
    /// Returns the selected basis index. Afterwards that index holds amplitude
    /// `1` and all others `0`, so measuring again yields the same index.
    ///
    /// # Errors
    ///
    /// - `MeasurementError::DegenerateState` if all amplitudes are zero.
    /// - `MeasurementError::NoOutcome` if the draw matched no cumulative bucket.
    ///
    /// The register is not collapsed on error.
    pub fn measure<R: Rng + ?Sized>(
        &mut self,
        measurement: &Measurement,
        rng: &mut R,
    ) -> Result<usize, MeasurementError> {
        if measurement.normalizes() {
            self.normalize();
        }

        let probs = Measurement::distribution(self.amplitudes.iter())?;
        let outcome = measurement.pick_outcome(&probs, rng)?;

        self.collapse(outcome);
        Ok(outcome)
    }

    fn collapse(&mut self, index: usize) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[index] = Complex64::new(1.0, 0.0);
        self.last_index = index;
    }
}
