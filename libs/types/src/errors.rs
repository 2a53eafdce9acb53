//! Error types for exchange arithmetic
//!
//! Amount computations never wrap or silently truncate to a wrong value;
//! they fail with one of these.

use thiserror::Error;

/// Arithmetic failures in amount, rate and fee computations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow in 256-bit amount calculation")]
    Overflow,

    #[error("Fee fraction exceeds 100%")]
    FeeTooLarge,
}
