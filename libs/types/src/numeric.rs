//! Fixed-width integer amounts and the scaled division helper
//!
//! Balances, supplies, allowances, rates and trade counters are all 256-bit
//! unsigned integers. Nothing in the exchange uses floating point. Every
//! conversion between base-currency and token units floors toward zero.

use alloy_primitives::U256;

use crate::errors::MathError;

/// A 256-bit unsigned amount (token units, base-currency units, rates).
pub type Amount = U256;

/// Allowance value that is never decremented by a spend.
pub const INFINITE_ALLOWANCE: Amount = U256::MAX;

/// Default accuracy constant for [`scaled_divide`] (10^5).
pub const DEFAULT_DIVISION_ACCURACY: Amount = U256::from_limbs([100_000, 0, 0, 0]);

/// One whole base-currency coin in its smallest unit (10^18).
pub const BASE_UNIT: Amount = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Compute `floor(floor(dividend * accuracy / divisor) / accuracy)`.
///
/// The result never exceeds the true quotient `dividend / divisor`, so a
/// conversion cannot manufacture value.
///
/// # Errors
/// - [`MathError::DivisionByZero`] if `divisor` or `accuracy` is zero
/// - [`MathError::Overflow`] if `dividend * accuracy` does not fit in 256 bits
pub fn scaled_divide(
    dividend: Amount,
    divisor: Amount,
    accuracy: Amount,
) -> Result<Amount, MathError> {
    if divisor.is_zero() || accuracy.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let scaled = dividend
        .checked_mul(accuracy)
        .ok_or(MathError::Overflow)?;

    Ok(scaled / divisor / accuracy)
}

/// Checked multiplication returning [`MathError::Overflow`].
pub fn checked_mul(a: Amount, b: Amount) -> Result<Amount, MathError> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

/// Checked addition returning [`MathError::Overflow`].
pub fn checked_add(a: Amount, b: Amount) -> Result<Amount, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}
