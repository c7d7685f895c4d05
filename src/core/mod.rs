pub mod errors;
mod measurements;
mod operator;
mod register;
pub mod utils;

pub use measurements::Measurement;
pub use operator::Operator;
pub use register::QuantumRegister;
