//! A minimal quantum state-vector simulation engine.
//!
//! Registers hold `2^n` complex amplitudes; operators are dense matrices built
//! from single-qubit gates via tensor products and composition. Gates are
//! applied to the full register and measurement collapses the state using an
//! injected random number generator.

pub mod algorithms;
mod core;
mod sampler;

pub use crate::core::{Measurement, Operator, QuantumRegister, errors, utils};
pub use crate::sampler::Sampler;
