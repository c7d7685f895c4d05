//! Quantum algorithms driven by the state-vector engine.

pub mod deutsch;
