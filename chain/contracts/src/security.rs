//! Administrator capability check
//!
//! The exchange has exactly one owner identity, fixed at construction.
//! Owner-gated operations compare the caller against it by value.

use types::ids::Address;

use crate::errors::ExchangeError;

/// Single-owner access control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    /// Create access control owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Check if `caller` is the owner.
    pub fn is_owner(&self, caller: &Address) -> bool {
        *caller == self.owner
    }

    /// Guard for owner-gated operations.
    pub fn only_owner(&self, caller: &Address) -> Result<(), ExchangeError> {
        if !self.is_owner(caller) {
            return Err(ExchangeError::NotOwner);
        }
        Ok(())
    }

    /// Get the owner identity.
    pub fn owner(&self) -> Address {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_passes_guard() {
        let alice = Address::repeat_byte(0xa1);
        let ownable = Ownable::new(alice);
        assert!(ownable.is_owner(&alice));
        assert_eq!(ownable.only_owner(&alice), Ok(()));
    }

    #[test]
    fn test_non_owner_rejected() {
        let ownable = Ownable::new(Address::repeat_byte(0xa1));
        let eve = Address::repeat_byte(0xee);
        assert_eq!(ownable.only_owner(&eve), Err(ExchangeError::NotOwner));
    }

    #[test]
    fn test_null_caller_rejected() {
        let ownable = Ownable::new(Address::repeat_byte(0xa1));
        assert_eq!(ownable.only_owner(&Address::ZERO), Err(ExchangeError::NotOwner));
    }
}
