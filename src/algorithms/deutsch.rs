//! Deutsch's algorithm.
//!
//! Decides whether a one-bit boolean function `f` is constant or balanced with
//! a single oracle query. The oracle acts on a 2-qubit register as
//! `|x, y> -> |x, y XOR f(x)>`, with `x` the most significant qubit.

use crate::{Measurement, Operator, QuantumRegister, errors::EngineError};
use rand::Rng;
use std::fmt;

const NUM_QUBITS: usize = 2;

/// The four boolean functions on one bit, encoded as oracle operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oracle {
    /// f(x) = 0
    Const0,
    /// f(x) = 1
    Const1,
    /// f(x) = x
    BalancedX,
    /// f(x) = NOT x
    BalancedNotX,
}

impl Oracle {
    pub const ALL: [Oracle; 4] = [
        Oracle::Const0,
        Oracle::Const1,
        Oracle::BalancedX,
        Oracle::BalancedNotX,
    ];

    /// Picks one of the four oracles uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Oracle {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Oracle::Const0 | Oracle::Const1)
    }

    /// Row-major 4x4 permutation matrix of the oracle.
    pub fn matrix(&self) -> [f64; 16] {
        match self {
            Oracle::Const0 => [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
            Oracle::Const1 => [
                0.0, 1.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, 0.0,
            ],
            Oracle::BalancedX => [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, 0.0,
            ],
            Oracle::BalancedNotX => [
                0.0, 1.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn operator(&self) -> Result<Operator, EngineError> {
        let dim = 1 << NUM_QUBITS;
        Ok(Operator::from_real_row_major(dim, dim, &self.matrix())?)
    }
}

impl fmt::Display for Oracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Oracle::Const0 => "f(x)=0 (constant)",
            Oracle::Const1 => "f(x)=1 (constant)",
            Oracle::BalancedX => "f(x)=x (balanced)",
            Oracle::BalancedNotX => "f(x)=¬x (balanced)",
        };
        f.write_str(s)
    }
}

/// Verdict read off the first qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeutschOutcome {
    Constant,
    Balanced,
}

impl DeutschOutcome {
    /// Interprets the measured value of the first qubit.
    pub fn from_first_qubit(bit: usize) -> Self {
        if bit == 0 {
            DeutschOutcome::Constant
        } else {
            DeutschOutcome::Balanced
        }
    }
}

/// Prepares |01>, applies H⊗H, the oracle, then H⊗I.
///
/// The returned register is ready to be measured.
pub fn prepare(oracle: Oracle) -> Result<QuantumRegister, EngineError> {
    let h = Operator::hadamard();
    let hh = Operator::tensor(&h, &h)?;
    let hi = Operator::tensor(&h, &Operator::i())?;
    let uf = oracle.operator()?;

    let mut reg = QuantumRegister::from_bitstring(NUM_QUBITS, "01")?;
    reg.apply_all([&hh, &uf, &hi])?;

    Ok(reg)
}

/// Runs Deutsch's algorithm against `oracle`.
pub fn run<R: Rng + ?Sized>(
    oracle: Oracle,
    measurement: &Measurement,
    rng: &mut R,
) -> Result<DeutschOutcome, EngineError> {
    let mut reg = prepare(oracle)?;
    let outcome = reg.measure(measurement, rng)?;

    // Project the basis index onto the most significant qubit
    let first_qubit = outcome / (reg.dimension() / 2);
    log::debug!(
        "oracle {} collapsed to index {}, first qubit {}",
        oracle,
        outcome,
        first_qubit
    );

    Ok(DeutschOutcome::from_first_qubit(first_qubit))
}
