//! Owner fee calculation
//!
//! The exchange owner skims a fixed fraction of every base-currency payment
//! received by a buy. The fraction is a fixed-point number over
//! [`FEE_DENOMINATOR`] (10^18 = 100%).

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::errors::MathError;
use crate::numeric::Amount;

/// Denominator representing 100%.
pub const FEE_DENOMINATOR: Amount = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Default owner fee (50%).
pub const DEFAULT_OWNER_FEE: Amount = U256::from_limbs([500_000_000_000_000_000, 0, 0, 0]);

/// Owner fee fraction, guaranteed to be at most 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "U256", into = "U256")]
pub struct FeeFraction(Amount);

impl FeeFraction {
    /// A zero fee.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Create a fee fraction from its raw numerator over [`FEE_DENOMINATOR`].
    pub fn new(raw: Amount) -> Result<Self, MathError> {
        if raw > FEE_DENOMINATOR {
            return Err(MathError::FeeTooLarge);
        }
        Ok(Self(raw))
    }

    /// Raw numerator over [`FEE_DENOMINATOR`].
    pub fn raw(&self) -> Amount {
        self.0
    }

    /// Fee owed on `amount`: `floor(amount * fraction / 10^18)`.
    pub fn apply(&self, amount: Amount) -> Result<Amount, MathError> {
        let product = amount.checked_mul(self.0).ok_or(MathError::Overflow)?;
        Ok(product / FEE_DENOMINATOR)
    }
}

impl Default for FeeFraction {
    fn default() -> Self {
        Self(DEFAULT_OWNER_FEE)
    }
}

impl TryFrom<U256> for FeeFraction {
    type Error = MathError;

    fn try_from(raw: U256) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<FeeFraction> for U256 {
    fn from(fee: FeeFraction) -> Self {
        fee.0
    }
}
