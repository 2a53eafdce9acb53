//! Contract-specific error types
//!
//! One variant per caller-visible failure. Every variant carries exactly the
//! data needed to reconstruct the failing condition, and no operation that
//! returns one of these has mutated any state.

use thiserror::Error;
use types::errors::MathError;
use types::ids::Address;
use types::numeric::Amount;

/// Errors raised by the token ledger and the exchange engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Unauthorized: caller is not the owner")]
    NotOwner,

    #[error("Token not supported: {token}")]
    InvalidToken { token: Address },

    #[error("Invalid amount: {amount} exceeds available inventory")]
    InvalidAmount { amount: Amount },

    #[error("Cannot mint initial supply to the zero address")]
    ZeroAddressMint,

    #[error("Cannot approve with zero address: owner {owner}, spender {spender}")]
    ZeroAddressApprove { owner: Address, spender: Address },

    #[error("Insufficient allowance for transfer of {requested}")]
    InsufficientAllowance { requested: Amount },

    #[error("Insufficient funds for transfer of {requested}")]
    InsufficientFunds { requested: Amount },

    #[error("Transfer of {amount} to {recipient} failed")]
    TransferFailed { recipient: Address, amount: Amount },

    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("Invalid exchange configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_amount_display() {
        let err = ExchangeError::InvalidAmount {
            amount: Amount::from(1_000_000u64),
        };
        assert!(err.to_string().contains("1000000"));
    }

    #[test]
    fn test_transfer_failed_display() {
        let err = ExchangeError::TransferFailed {
            recipient: Address::repeat_byte(0x42),
            amount: Amount::from(5000u64),
        };
        let msg = err.to_string();
        assert!(msg.contains("5000"));
        assert!(msg.to_lowercase().contains("0x4242"));
    }

    #[test]
    fn test_error_from_math() {
        let err: ExchangeError = MathError::DivisionByZero.into();
        assert_eq!(err, ExchangeError::Math(MathError::DivisionByZero));
    }

    #[test]
    fn test_zero_address_approve_carries_both_parties() {
        let owner = Address::repeat_byte(0x01);
        let err = ExchangeError::ZeroAddressApprove {
            owner,
            spender: Address::ZERO,
        };
        assert!(matches!(
            err,
            ExchangeError::ZeroAddressApprove { owner: o, spender: s } if o == owner && s == Address::ZERO
        ));
    }
}
