//! Utility functions for the state-vector engine.
//!
//! This module contains helper functions for:
//! - Fallible buffer allocation for amplitudes and operators.
//! - Matrix operations (Kronecker product).
//! - Register sizing and basis bitstring parsing.

use crate::core::errors::{OperatorError, RegisterError};
use ndarray::{Array2, Axis, Zip};
use num_complex::Complex64;
use std::collections::TryReserveError;

/// Allocates a zero-filled buffer of `len` complex entries without aborting on exhaustion.
pub fn allocate_zeroed(len: usize) -> Result<Vec<Complex64>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, Complex64::new(0.0, 0.0));
    log::trace!("allocated buffer of {} entries", len);
    Ok(buf)
}

/// Allocates a zero-filled `rows x cols` matrix.
pub fn zeroed_matrix(rows: usize, cols: usize) -> Result<Array2<Complex64>, OperatorError> {
    let len = rows.checked_mul(cols).ok_or(OperatorError::TooLarge)?;
    let buf = allocate_zeroed(len).map_err(|_| OperatorError::AllocationFailed { len })?;
    Ok(Array2::from_shape_vec((rows, cols), buf)?)
}

/// Computes the Kronecker (Tensor) product of two matrices.
///
/// If `A` is an $m \times n$ matrix and `B` is a $p \times q$ matrix,
/// the result is an $mp \times nq$ matrix with
/// `result[i*p + k][j*q + l] = A[i][j] * B[k][l]`.
pub fn kronecker_product(
    a: &Array2<Complex64>,
    b: &Array2<Complex64>,
) -> Result<Array2<Complex64>, OperatorError> {
    let (m, n) = a.dim();
    let (p, q) = b.dim();

    let rows = m.checked_mul(p).ok_or(OperatorError::TooLarge)?;
    let cols = n.checked_mul(q).ok_or(OperatorError::TooLarge)?;
    let mut result = zeroed_matrix(rows, cols)?;

    // A viewed as (m, 1, n, 1), B as (1, p, 1, q)
    let a_expanded = a.view().insert_axis(Axis(1)).insert_axis(Axis(3));
    let b_expanded = b.view().insert_axis(Axis(0)).insert_axis(Axis(2));

    // Output viewed as (m, p, n, q) shares the row-major layout of (m*p, n*q)
    let blocks = result.view_mut().into_shape_with_order((m, p, n, q))?;

    Zip::from(blocks)
        .and_broadcast(&a_expanded)
        .and_broadcast(&b_expanded)
        .for_each(|out, &x, &y| *out = x * y);

    Ok(result)
}

/// Returns the state-space dimension `2^n` of an `n`-qubit register.
pub fn dimension_for(num_qubits: usize) -> Result<usize, RegisterError> {
    if num_qubits == 0 {
        return Err(RegisterError::InvalidQubitCount(num_qubits));
    }

    u32::try_from(num_qubits)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .ok_or(RegisterError::TooManyQubits(num_qubits))
}

/// Parses a most-significant-bit-first string of '0'/'1' into a basis index.
pub fn parse_bitstring(bits: &str, num_qubits: usize) -> Result<usize, RegisterError> {
    let len = bits.chars().count();
    if len != num_qubits {
        return Err(RegisterError::BitstringLength {
            expected: num_qubits,
            got: len,
        });
    }

    bits.chars().enumerate().try_fold(0usize, |acc, (position, c)| {
        let bit = match c {
            '0' => 0,
            '1' => 1,
            found => return Err(RegisterError::InvalidBitstringChar { position, found }),
        };
        Ok((acc << 1) | bit)
    })
}

/// Sum of squared magnitudes of a slice of amplitudes.
pub fn norm_sqr<'a>(amplitudes: impl IntoIterator<Item = &'a Complex64>) -> f64 {
    amplitudes.into_iter().map(|c| c.norm_sqr()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn kronecker_of_rectangular_blocks() {
        // 1x2 (x) 2x1 -> 2x2
        let a = arr2(&[[c(1.0), c(2.0)]]);
        let b = arr2(&[[c(3.0)], [c(5.0)]]);

        let k = kronecker_product(&a, &b).unwrap();

        assert_eq!(k.dim(), (2, 2));
        assert_eq!(k, arr2(&[[c(3.0), c(6.0)], [c(5.0), c(10.0)]]));
    }

    #[test]
    fn kronecker_with_identity_places_blocks_on_diagonal() {
        let eye = Array2::<Complex64>::eye(2);
        let x = arr2(&[[c(0.0), c(1.0)], [c(1.0), c(0.0)]]);

        let k = kronecker_product(&eye, &x).unwrap();

        assert_eq!(k.dim(), (4, 4));
        assert_eq!(k[[0, 1]], c(1.0));
        assert_eq!(k[[1, 0]], c(1.0));
        assert_eq!(k[[2, 3]], c(1.0));
        assert_eq!(k[[3, 2]], c(1.0));
        assert_eq!(k[[0, 3]], c(0.0));
        assert_eq!(k[[2, 1]], c(0.0));
    }

    #[test]
    fn parses_msb_first() {
        assert_eq!(parse_bitstring("10", 2).unwrap(), 2);
        assert_eq!(parse_bitstring("01", 2).unwrap(), 1);
        assert_eq!(parse_bitstring("110", 3).unwrap(), 6);
    }

    #[test]
    fn rejects_malformed_bitstrings() {
        assert!(matches!(
            parse_bitstring("101", 2),
            Err(RegisterError::BitstringLength {
                expected: 2,
                got: 3
            })
        ));
        assert!(matches!(
            parse_bitstring("1a", 2),
            Err(RegisterError::InvalidBitstringChar {
                position: 1,
                found: 'a'
            })
        ));
    }

    #[test]
    fn dimension_bounds() {
        assert_eq!(dimension_for(1).unwrap(), 2);
        assert_eq!(dimension_for(3).unwrap(), 8);
        assert!(matches!(
            dimension_for(0),
            Err(RegisterError::InvalidQubitCount(0))
        ));
        assert!(matches!(
            dimension_for(usize::BITS as usize),
            Err(RegisterError::TooManyQubits(_))
        ));
    }
}
