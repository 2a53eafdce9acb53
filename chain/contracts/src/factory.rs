//! Token Factory: constructs new token ledgers for the exchange
//!
//! Each created ledger gets a fresh address derived from the factory's
//! deployer identity and a creation nonce, and its whole initial supply is
//! minted to the deployer.

use serde::{Deserialize, Serialize};
use types::ids::{contract_address, Address};
use types::numeric::Amount;

use crate::errors::ExchangeError;
use crate::ledger::{TokenLedger, TokenMetadata};

/// Parameters for a new token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub initial_supply: Amount,
}

impl TokenConfig {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        initial_supply: Amount,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            initial_supply,
        }
    }
}

/// Creates token ledgers owned by `deployer`.
#[derive(Debug, Clone)]
pub struct TokenFactory {
    deployer: Address,
    /// Next creation nonce (contract nonces start at 1)
    nonce: u64,
}

impl TokenFactory {
    pub fn new(deployer: Address) -> Self {
        Self { deployer, nonce: 1 }
    }

    /// Address the next created token will receive.
    pub fn next_address(&self) -> Address {
        contract_address(&self.deployer, self.nonce)
    }

    /// Deploy a new ledger with the deployer as supply owner.
    pub fn create_token(&mut self, config: TokenConfig) -> Result<TokenLedger, ExchangeError> {
        let address = self.next_address();
        let metadata = TokenMetadata {
            name: config.name,
            symbol: config.symbol,
            decimals: config.decimals,
        };

        let ledger = TokenLedger::new(address, metadata, config.initial_supply, self.deployer)?;
        self.nonce += 1;
        Ok(ledger)
    }
}
