//! Identity types for ledger holders and contracts
//!
//! Every participant (user account, exchange engine, token ledger) is
//! identified by a 20-byte address. The all-zero address is the null
//! identity: it never holds minted supply and can never approve.

use sha2::{Digest, Sha256};

pub use alloy_primitives::Address;

/// The null identity.
pub const NULL_ADDRESS: Address = Address::ZERO;

/// Returns `true` if `address` is the null identity.
pub fn is_null(address: &Address) -> bool {
    *address == NULL_ADDRESS
}

/// Derive the address of a contract created by `deployer` at `nonce`.
///
/// The address is the last 20 bytes of `SHA-256(deployer || nonce_be)`.
/// Distinct `(deployer, nonce)` pairs give distinct addresses, so a
/// deployer that bumps its nonce on every creation never reuses one.
pub fn contract_address(deployer: &Address, nonce: u64) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(deployer.as_slice());
    hasher.update(nonce.to_be_bytes());
    let digest = hasher.finalize();
    Address::from_slice(&digest[12..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_address() {
        assert!(is_null(&Address::ZERO));
        assert!(!is_null(&Address::repeat_byte(0x01)));
    }

    #[test]
    fn test_contract_address_deterministic() {
        let deployer = Address::repeat_byte(0xaa);
        assert_eq!(
            contract_address(&deployer, 1),
            contract_address(&deployer, 1)
        );
    }

    #[test]
    fn test_contract_address_varies_by_nonce_and_deployer() {
        let a = Address::repeat_byte(0xaa);
        let b = Address::repeat_byte(0xbb);
        assert_ne!(contract_address(&a, 1), contract_address(&a, 2));
        assert_ne!(contract_address(&a, 1), contract_address(&b, 1));
    }

    #[test]
    fn test_contract_address_never_null() {
        let deployer = Address::ZERO;
        for nonce in 0..64 {
            assert!(!is_null(&contract_address(&deployer, nonce)));
        }
    }

    #[test]
    fn test_address_serialization() {
        let addr = Address::repeat_byte(0x11);
        let json = serde_json::to_string(&addr).unwrap();
        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }
}
