use ndarray::ShapeError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum OperatorError {
    #[error("Invalid Dimensions")]
    InvalidDimensions,

    #[error("Row-major buffer has {got} entries, expected {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Cannot compose: left width {left_width} != right height {right_height}")]
    CompositionMismatch {
        left_width: usize,
        right_height: usize,
    },

    #[error("Operator shape overflows the address space")]
    TooLarge,

    #[error("Failed to allocate operator buffer of {len} entries")]
    AllocationFailed { len: usize },

    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),
}

#[derive(Error, Debug, Clone)]
pub enum RegisterError {
    #[error("Qubit count must be at least 1, got {0}")]
    InvalidQubitCount(usize),

    #[error("Amplitude vector length {0} is not a power of two >= 2")]
    InvalidDimensions(usize),

    #[error("Register of {0} qubits does not fit in memory")]
    TooManyQubits(usize),

    #[error("Bitstring has length {got}, expected {expected}")]
    BitstringLength { expected: usize, got: usize },

    #[error("Invalid character {found:?} at position {position} in bitstring")]
    InvalidBitstringChar { position: usize, found: char },

    #[error("Dimension mismatch")]
    DimensionMismatch {
        expected: usize,
        got_rows: usize,
        got_cols: usize,
    },

    #[error("Failed to allocate amplitude buffer of {len} entries")]
    AllocationFailed { len: usize },
}

#[derive(Error, Debug, Clone)]
pub enum MeasurementError {
    #[error("Probability distribution sums to zero")]
    DegenerateState,

    #[error("Random draw {draw} matched no cumulative bucket")]
    NoOutcome { draw: f64 },

    #[error("Invalid certainty threshold: {0}. Must be in (0.5, 1.0]")]
    InvalidThreshold(f64),
}

#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("Operator error: {0}")]
    OperatorError(#[from] OperatorError),

    #[error("Register error: {0}")]
    RegisterError(#[from] RegisterError),

    #[error("Measurement error: {0}")]
    MeasurementError(#[from] MeasurementError),
}
