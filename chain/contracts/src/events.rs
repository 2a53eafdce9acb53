//! Contract events
//!
//! Events are immutable records emitted by ledger and exchange operations.
//! Ledgers log `Transfer`/`Approval`; the exchange logs the rest.

use serde::{Deserialize, Serialize};
use types::ids::Address;
use types::numeric::Amount;

/// Tokens moved between holders (mint when `from` is the zero address).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub value: Amount,
}

/// Allowance set for a spender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
    pub value: Amount,
}

/// New token ledger created and registered with the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewToken {
    pub token: Address,
}

/// Buy/sell rates overwritten by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatesUpdate {
    pub token: Address,
    pub buy_rate: Amount,
    pub sell_rate: Amount,
}

/// Caller bought `amount` tokens from exchange custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buy {
    pub buyer: Address,
    pub token: Address,
    pub amount: Amount,
}

/// Caller sold `amount` tokens into exchange custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub seller: Address,
    pub token: Address,
    pub amount: Amount,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Transfer(Transfer),
    Approval(Approval),
    NewToken(NewToken),
    RatesUpdate(RatesUpdate),
    Buy(Buy),
    Sale(Sale),
}
