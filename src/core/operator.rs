use crate::core::errors::OperatorError;
use crate::core::utils;
use ndarray::linalg::general_mat_mul;
use ndarray::{Array2, arr2};
use num_complex::Complex64;

/// A linear operator over complex amplitudes.
///
/// Stored as a dense `height x width` matrix in row-major order, so that
/// `entry(r, c) == data[r * width + c]` for the flat form accepted by
/// [`Operator::from_row_major`].
#[derive(Clone, Debug, PartialEq)]
pub struct Operator {
    /// The matrix of the operator.
    pub matrix: Array2<Complex64>,
}

impl Operator {
    /// Wraps an existing matrix.
    pub fn new(matrix: Array2<Complex64>) -> Self {
        Self { matrix }
    }

    /// Builds an operator from a flat row-major buffer.
    ///
    /// # Arguments
    ///
    /// * `height` - Number of rows.
    /// * `width` - Number of columns.
    /// * `data` - Entries in row-major order, `entry(r, c) = data[r * width + c]`.
    ///
    /// # Errors
    ///
    /// Returns an `OperatorError` if:
    /// - `height * width` overflows (`TooLarge`).
    /// - `data.len() != height * width` (`ShapeMismatch`).
    pub fn from_row_major(
        height: usize,
        width: usize,
        data: Vec<Complex64>,
    ) -> Result<Self, OperatorError> {
        let expected = height.checked_mul(width).ok_or(OperatorError::TooLarge)?;
        if data.len() != expected {
            return Err(OperatorError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }

        Ok(Self {
            matrix: Array2::from_shape_vec((height, width), data)?,
        })
    }

    /// Builds an operator from a flat row-major buffer of real entries.
    ///
    /// Fails under the same conditions as [`Operator::from_row_major`].
    pub fn from_real_row_major(
        height: usize,
        width: usize,
        data: &[f64],
    ) -> Result<Self, OperatorError> {
        let data = data.iter().map(|&re| Complex64::new(re, 0.0)).collect();
        Self::from_row_major(height, width, data)
    }

    pub fn height(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn width(&self) -> usize {
        self.matrix.ncols()
    }

    /// Entry at row `r`, column `c`.
    pub fn entry(&self, r: usize, c: usize) -> Option<Complex64> {
        self.matrix.get([r, c]).copied()
    }

    pub fn is_square(&self) -> bool {
        self.height() == self.width()
    }

    /// Checks if the operator is unitary (U U† = I) within `tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let eye = Array2::<Complex64>::eye(self.height());
        let u_dagger = self.matrix.t().mapv(|x| x.conj());
        let product = self.matrix.dot(&u_dagger);

        product
            .iter()
            .zip(eye.iter())
            .all(|(a, b)| (*a - *b).norm() < tol)
    }

    /// Kronecker product `left ⊗ right`.
    ///
    /// The result has shape `(left.height * right.height) x (left.width * right.width)`.
    /// This is how single-qubit gates are lifted onto a multi-qubit register:
    /// `H ⊗ I` acts with `H` on the most significant qubit and leaves the other untouched.
    pub fn tensor(left: &Operator, right: &Operator) -> Result<Operator, OperatorError> {
        let matrix = utils::kronecker_product(&left.matrix, &right.matrix)?;
        log::trace!(
            "tensor {:?} x {:?} -> {:?}",
            left.matrix.dim(),
            right.matrix.dim(),
            matrix.dim()
        );
        Ok(Operator { matrix })
    }

    /// Matrix product `left · right`.
    ///
    /// Applying the result to a register is equivalent to applying `right`
    /// first and then `left`.
    ///
    /// # Errors
    ///
    /// Returns `OperatorError::CompositionMismatch` if `left.width != right.height`.
    pub fn compose(left: &Operator, right: &Operator) -> Result<Operator, OperatorError> {
        if left.width() != right.height() {
            return Err(OperatorError::CompositionMismatch {
                left_width: left.width(),
                right_height: right.height(),
            });
        }

        let mut matrix = utils::zeroed_matrix(left.height(), right.width())?;
        general_mat_mul(
            Complex64::new(1.0, 0.0),
            &left.matrix,
            &right.matrix,
            Complex64::new(0.0, 0.0),
            &mut matrix,
        );

        Ok(Operator { matrix })
    }

    /// Lifts `self` onto `n` copies of itself: `self ⊗ self ⊗ ... ⊗ self`.
    pub fn tensor_power(&self, n: usize) -> Result<Operator, OperatorError> {
        if n == 0 {
            return Err(OperatorError::InvalidDimensions);
        }
        (1..n).try_fold(self.clone(), |acc, _| Operator::tensor(&acc, self))
    }

    // --- Standard Gates ---

    /// Identity operator of dimension `dim`.
    pub fn identity(dim: usize) -> Operator {
        Operator {
            matrix: Array2::eye(dim),
        }
    }

    /// Single-qubit identity.
    pub fn i() -> Operator {
        Operator::identity(2)
    }

    /// Hadamard gate.
    pub fn hadamard() -> Operator {
        let factor = 1.0 / 2.0_f64.sqrt();
        Operator {
            matrix: arr2(&[
                [Complex64::new(factor, 0.0), Complex64::new(factor, 0.0)],
                [Complex64::new(factor, 0.0), Complex64::new(-factor, 0.0)],
            ]),
        }
    }

    /// Pauli-X gate (NOT gate).
    pub fn not() -> Operator {
        Operator {
            matrix: arr2(&[
                [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
                [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            ]),
        }
    }
}
